//! Error types for the HTTP server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pubsite_registry::{RegistryError, ValidationErrors};
use pubsite_resolver::ResolveError;
use serde_json::json;

/// Server error type.
///
/// Public-site failures answer in plain text; management API failures
/// answer in JSON.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Public-site resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Missing or malformed owner header.
    #[error("Unauthorized")]
    Unauthorized,

    /// Site id in the path is not a number.
    #[error("Invalid site ID: {0}")]
    InvalidSiteId(String),

    /// No site with the given id.
    #[error("Site not found: {0}")]
    SiteNotFound(i64),

    /// Caller does not own the site.
    #[error("Forbidden")]
    Forbidden,

    /// Request body is not a valid site JSON document.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Site input failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Registry failure in a management call.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::Resolve(e) => resolve_response(&e),
            Self::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::InvalidSiteId(_) => json_error(StatusCode::BAD_REQUEST, "Invalid site ID"),
            Self::SiteNotFound(_) => json_error(StatusCode::NOT_FOUND, "Site not found"),
            Self::Forbidden => json_error(StatusCode::FORBIDDEN, "Forbidden"),
            Self::InvalidBody(rejection) => json_error(rejection.status(), &rejection.body_text()),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({"errors": errors})),
            )
                .into_response(),
            Self::Registry(e) => {
                tracing::error!(error = %e, "Site registry failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({"error": message}))).into_response()
}

fn resolve_response(e: &ResolveError) -> Response {
    let status = match e {
        ResolveError::MalformedHost(_) => StatusCode::BAD_REQUEST,
        ResolveError::SiteNotFound(_) | ResolveError::FileNotFound { .. } => StatusCode::NOT_FOUND,
        ResolveError::Registry(_) | ResolveError::RenderFailed(_) => {
            tracing::error!(error = ?e, "Public site request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };
    (status, e.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsite_fetch::FetchError;

    #[test]
    fn test_resolve_status_codes() {
        let cases = [
            (ResolveError::MalformedHost("localhost".to_owned()), StatusCode::BAD_REQUEST),
            (ResolveError::SiteNotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (
                ResolveError::FileNotFound {
                    path: "a.md".to_owned(),
                    source: FetchError::Upstream { status: 502 },
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ResolveError::Registry(RegistryError::Unavailable("down".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ServerError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let mut errors = ValidationErrors::default();
        errors.add("slug", "This slug is already taken");

        let response = ServerError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
