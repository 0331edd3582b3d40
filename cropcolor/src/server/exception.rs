//! OWS-style exception reports.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::job::{codes, ProcessError};

/// Code for an unsupported `request` value.
pub const OPERATION_NOT_SUPPORTED: &str = "OperationNotSupported";

/// One exception entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exception {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    pub text: String,
}

/// An exception report and the HTTP status it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    pub status: StatusCode,
    pub exceptions: Vec<Exception>,
}

#[derive(Serialize)]
struct Body<'a> {
    exceptions: &'a [Exception],
}

impl ExceptionReport {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        locator: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            status,
            exceptions: vec![Exception {
                code,
                locator: locator.map(str::to_string),
                text: text.into(),
            }],
        }
    }

    /// A required request parameter is missing.
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::MISSING_PARAMETER_VALUE,
            Some(name),
            format!("missing parameter '{name}'"),
        )
    }

    /// A request parameter has an unusable value.
    pub fn invalid_parameter(name: &str, text: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_PARAMETER_VALUE,
            Some(name),
            text,
        )
    }

    /// Unexpected server-side failure.
    pub fn internal(text: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::NO_APPLICABLE_CODE,
            None,
            text,
        )
    }
}

impl From<&ProcessError> for ExceptionReport {
    fn from(err: &ProcessError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.code(), err.locator(), err.to_string())
    }
}

impl IntoResponse for ExceptionReport {
    fn into_response(self) -> Response {
        let body = Body {
            exceptions: &self.exceptions,
        };
        (self.status, Json(body)).into_response()
    }
}
