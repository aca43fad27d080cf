//! HTTP error mapping.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use certvault_core::Error;

/// Error returned by handlers; wraps a core error and picks the status.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Unauthorized(_) => StatusCode::FORBIDDEN,
            Error::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Error::MissingOwnerContext => StatusCode::PRECONDITION_REQUIRED,
            Error::OwnerChangeRejected | Error::AlreadyExists(_) => StatusCode::CONFLICT,
            Error::Config(_) | Error::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        let code = self.status().as_u16();
        match &self.0 {
            Error::NotFound(what) => format!("{code}: {what} not found"),
            Error::Unauthorized(why) => format!("{code}: Unauthorized, {why}"),
            Error::Config(_) | Error::Password(_) => {
                format!("{code}: Internal server error")
            }
            other => format!("{code}: {other}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let mut response = (status, self.message()).into_response();
        if matches!(self.0, Error::Unauthenticated) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(r#"Basic realm="certvault""#),
            );
        }
        response
    }
}
