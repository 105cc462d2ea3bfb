//! HTTP error response handling
//!
//! Errors become plain-text responses: the status comes from
//! [`ToHttpStatus`] and the body is the error's display text. The
//! machine-readable code goes in the `X-Error-Code` header.

use crate::error::{Error, ToHttpStatus};
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Response header carrying [`ToHttpStatus::error_code`]
pub const ERROR_CODE_HEADER: &str = "x-error-code";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status_code, self.to_string()).into_response();
        if let Ok(code) = HeaderValue::from_str(self.error_code()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(ERROR_CODE_HEADER), code);
        }
        response
    }
}
