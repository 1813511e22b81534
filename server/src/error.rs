use std::process::{ExitCode, Termination};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use serde_json::json;

use kernel::KernelError;

const INTERNAL_MESSAGE: &str = "oops something went wrong";
const INVALID_PAYLOAD_MESSAGE: &str = "unable to parse the request";

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

/// Error half of every handler. Renders as `{"message": ...}`; the report
/// behind it is logged and never sent to the client.
#[derive(Debug)]
pub struct ErrorStatus {
    status: StatusCode,
    message: String,
    report: Option<Report<KernelError>>,
}

impl ErrorStatus {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            report: None,
        }
    }

    /// Overrides the status and message when the report carries `context`.
    pub fn when(mut self, context: KernelError, status: StatusCode, message: impl Into<String>) -> Self {
        if self
            .report
            .as_ref()
            .is_some_and(|report| report.current_context() == &context)
        {
            self.status = status;
            self.message = message.into();
        }
        self
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        let (status, message) = match e.current_context() {
            KernelError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            KernelError::AlreadyExists => (StatusCode::BAD_REQUEST, "already exists"),
            KernelError::Referenced => (StatusCode::CONFLICT, "still referenced"),
            KernelError::Timeout | KernelError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        };
        Self {
            status,
            message: message.to_string(),
            report: Some(e),
        }
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        tracing::debug!("rejected body: {}", text);
        match rejection {
            JsonRejection::JsonDataError(_) => type_mismatch(&text)
                .map(Self::bad_request)
                .unwrap_or_else(|| Self::bad_request(INVALID_PAYLOAD_MESSAGE)),
            _ => Self::bad_request(INVALID_PAYLOAD_MESSAGE),
        }
    }
}

/// `'<field>' should be <kind>` for a field holding the wrong JSON type.
/// Reads the `<path>: invalid type: ..., expected <kind>` text of a data error.
fn type_mismatch(text: &str) -> Option<String> {
    let (_, detail) = text.split_once("target type: ")?;
    let (field, reason) = detail.split_once(": invalid type: ")?;
    let (_, expected) = reason.split_once("expected ")?;
    let kind = if ["f64", "f32", "i64", "i32", "u64", "u32"]
        .iter()
        .any(|number| expected.starts_with(number))
    {
        "a number"
    } else if expected.starts_with("a string") {
        "a string"
    } else if expected.starts_with("a sequence") {
        "an array"
    } else {
        return None;
    };
    Some(format!("'{field}' should be {kind}"))
}

impl From<QueryRejection> for ErrorStatus {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query: {}", rejection.body_text());
        Self::bad_request(INVALID_PAYLOAD_MESSAGE)
    }
}

impl From<PathRejection> for ErrorStatus {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path: {}", rejection.body_text());
        Self::bad_request(INVALID_PAYLOAD_MESSAGE)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        match &self.report {
            Some(report) if self.status.is_server_error() => tracing::error!("{:?}", report),
            Some(report) => tracing::debug!("{:?}", report),
            None => tracing::debug!(status = %self.status, "{}", self.message),
        }
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use error_stack::Report;

    use kernel::KernelError;

    use super::ErrorStatus;

    #[test]
    fn default_mapping() {
        let status = |context: KernelError| ErrorStatus::from(Report::new(context)).status();
        assert_eq!(status(KernelError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(KernelError::AlreadyExists), StatusCode::BAD_REQUEST);
        assert_eq!(status(KernelError::Referenced), StatusCode::CONFLICT);
        assert_eq!(status(KernelError::Timeout), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(KernelError::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let text = "Failed to deserialize the JSON body into the target type: \
                    price: invalid type: string \"cheap\", expected f64 at line 1 column 17";
        assert_eq!(
            super::type_mismatch(text).as_deref(),
            Some("'price' should be a number")
        );
        let text = "Failed to deserialize the JSON body into the target type: \
                    genres: invalid type: string \"horror\", expected a sequence at line 1 column 18";
        assert_eq!(
            super::type_mismatch(text).as_deref(),
            Some("'genres' should be an array")
        );
        let text = "Failed to deserialize the JSON body into the target type: \
                    invalid type: sequence, expected struct CreateRequest at line 1 column 0";
        assert_eq!(super::type_mismatch(text), None);
    }

    #[test]
    fn override_only_matching_context() {
        let overridden = ErrorStatus::from(Report::new(KernelError::NotFound)).when(
            KernelError::NotFound,
            StatusCode::BAD_REQUEST,
            "invalid genre",
        );
        assert_eq!(overridden.status(), StatusCode::BAD_REQUEST);

        let untouched = ErrorStatus::from(Report::new(KernelError::Internal)).when(
            KernelError::NotFound,
            StatusCode::BAD_REQUEST,
            "invalid genre",
        );
        assert_eq!(untouched.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
