use crate::{controller::health_check_controller, middleware::auth_callback, AppState};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::services::ServeDir;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Building Management Platform API"
    ),
    paths(
        health_check_controller::health_check,
    ),
    tags(
        (name = "building_platform", description = "Building management & tenant services API")
    )
)]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
        // Callback classification wraps every route, including the static
        // fallback: it must see the entry path before normal rendering does.
        .layer(from_fn_with_state(app_state, auth_callback::classify_callback))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

// This will serve static files that we can use as a "fallback" for when no
// routing decision applies and normal page rendering should proceed
pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use clap::Parser;
    use service::config::Config;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = Config::parse_from(["building_platform_rs"]);
        define_routes(AppState::new(config))
    }

    #[tokio::test]
    async fn test_health_endpoint_responds() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_callback_classification_runs_before_fallback_rendering() {
        let request = Request::builder()
            .uri("/?access_token=abc123&type=recovery")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/reset-password?access_token=abc123&type=recovery")
        );
    }
}
