use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};
use tracing::error;

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

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    error_key: &'static str,
    message: String,
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        let (status, kind, error_key) = match context {
            KernelError::ItemNotFound => (StatusCode::NOT_FOUND, "not_found", "item_not_found"),
            KernelError::WishlistNotFound => {
                (StatusCode::NOT_FOUND, "not_found", "wishlist_not_found")
            }
            KernelError::BookingNotAvailable => (
                StatusCode::FORBIDDEN,
                "no_permission",
                "booking_not_available",
            ),
            KernelError::ItemBookedByAnotherUser => (
                StatusCode::FORBIDDEN,
                "no_permission",
                "forbidden_booked_by_another_user",
            ),
            KernelError::ItemAlreadyBooked => {
                (StatusCode::CONFLICT, "conflict", "item_already_booked")
            }
            KernelError::Concurrency => (StatusCode::CONFLICT, "conflict", "concurrent_update"),
            KernelError::Timeout => (StatusCode::REQUEST_TIMEOUT, "timeout", "timeout"),
            KernelError::InvalidEventPayload
            | KernelError::EventBusClosed
            | KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal"),
        };
        if status.is_server_error() {
            error!("{:?}", self.0);
        }
        let body = ErrorBody {
            kind,
            error_key,
            message: context.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
