use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.join(" "))]
    Validation(Vec<String>),
    #[error("No valid fields provided for update.")]
    NoValidFields,
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid class ID supplied.")]
    MalformedIdentifier,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::NoValidFields
            | ApiError::MalformedBody(_)
            | ApiError::MalformedIdentifier => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "request rejected");
                other.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::MalformedBody(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logs_at_info_level(err: ApiError) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = err.into_response();
        });
        logs.contents()
    }

    #[test]
    fn test_client_errors_are_logged_at_default_level() {
        let logs = logs_at_info_level(ApiError::NoValidFields);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("No valid fields provided for update."));

        let logs = logs_at_info_level(ApiError::MalformedIdentifier);
        assert!(logs.contains("Invalid class ID supplied."));
    }

    #[test]
    fn test_internal_errors_are_logged_with_detail() {
        let logs = logs_at_info_level(ApiError::Internal("connection refused".into()));
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("connection refused"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(vec!["bad".into()]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NoValidFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedIdentifier.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("Class not found.".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_joins_every_violation() {
        let err = ApiError::Validation(vec![
            "Name is required and must contain letters only.".into(),
            "At least one item is required.".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Name is required and must contain letters only. At least one item is required."
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }
}
