use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use domain::{AuthCallbackRouter, Location};
use log::*;
use service::AppState;

/// Middleware that classifies post-authentication callbacks before normal
/// rendering gets a chance to run.
///
/// Each request counts as one mount of the classifier lifecycle, so every
/// navigation gets a fresh instance with a fresh evaluation guard. Requests
/// that produce no routing decision fall through to the inner handlers
/// untouched; this middleware never fails a request.
pub async fn classify_callback(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri();
    // Fragments are never transmitted to servers, so the snapshot's hash is
    // empty here; fragment-borne tokens are classified client-side against the
    // same decision logic.
    let location = Location::new(uri.path(), uri.query().unwrap_or(""), "");

    let mut callback_router = AuthCallbackRouter::new(app_state.config.entry_path());
    let decision = callback_router.evaluate_once(&location);

    match decision.target(&location) {
        Some(target) => {
            info!(
                "Authenticated callback at {}, redirecting to {target}",
                location.path()
            );
            // The Location header carries no fragment of its own, so user
            // agents re-attach the original fragment verbatim.
            Redirect::temporary(&target).into_response()
        }
        None => next.run(request).await,
    }
}
