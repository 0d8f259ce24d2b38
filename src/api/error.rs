use crate::application::lending::LendingError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(LendingError);

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 404 Not Found - 貸出記録が存在しない
            error @ LendingError::NotOnLoan { .. } => {
                (StatusCode::NOT_FOUND, "NOT_ON_LOAN", error.to_string())
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            error @ LendingError::UnknownItem { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_ITEM",
                error.to_string(),
            ),
            error @ LendingError::UnknownCustomer { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_CUSTOMER",
                error.to_string(),
            ),
            error @ LendingError::AlreadyOnLoan { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ALREADY_ON_LOAN",
                error.to_string(),
            ),
            error @ LendingError::ReservationPriorityViolation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "RESERVATION_PRIORITY_VIOLATION",
                error.to_string(),
            ),
            error @ LendingError::SelfReservationForbidden { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SELF_RESERVATION_FORBIDDEN",
                error.to_string(),
            ),
            error @ LendingError::AlreadyQueued { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ALREADY_QUEUED",
                error.to_string(),
            ),
            error @ LendingError::CapacityExceeded { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CAPACITY_EXCEEDED",
                error.to_string(),
            ),

            // 500 Internal Server Error - ポート障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            LendingError::CatalogError(ref cause) => {
                tracing::error!("Catalog error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CATALOG_ERROR",
                    "Catalog error".to_string(),
                )
            }
            LendingError::CustomerRegistryError(ref cause) => {
                tracing::error!("Customer registry error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CUSTOMER_REGISTRY_ERROR",
                    "Customer registry error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
