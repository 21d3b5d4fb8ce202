use axum::http::HeaderValue;
use log::*;
use tower_http::cors::CorsLayer;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

pub use error::{Error, Result};
pub use service::AppState;

pub(crate) mod controller;
pub mod error;
pub(crate) mod middleware;
pub mod router;

/// Binds the listener and serves the application router until shutdown.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let server_url = format!("{host}:{port}");

    let cors_layer = CorsLayer::new()
        .allow_origin(parse_allowed_origins(&app_state.config.allowed_origins)?)
        .allow_credentials(true);

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    info!("Server listening on http://{server_url}");

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await?;

    Ok(())
}

fn parse_allowed_origins(allowed_origins: &[String]) -> Result<Vec<HeaderValue>> {
    allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|err| {
                warn!("Invalid allowed origin: {origin:?}");
                Error::from(DomainError {
                    source: Some(Box::new(err)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins_accepts_valid_urls() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://app.example-buildings.com".to_string(),
        ];

        let parsed = parse_allowed_origins(&origins).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_parse_allowed_origins_rejects_non_header_values() {
        let origins = vec!["http://localhost:3000\n".to_string()];

        assert!(parse_allowed_origins(&origins).is_err());
    }
}
