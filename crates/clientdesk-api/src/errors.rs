use crate::dto::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use clientdesk_chat::ChatError;
use clientdesk_db::DatabaseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad gateway: {0}")]
    BadGateway(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal server error")]
    InternalServerError,
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // NOTE: Error is already logged in the DatabaseError layer
        match err {
            DatabaseError::NotFound { .. } => {
                Self::NotFound("The requested resource was not found".to_string())
            }
            DatabaseError::UniqueViolation { .. } => {
                Self::Conflict("The resource already exists".to_string())
            }
            DatabaseError::ForeignKeyViolation { .. } => {
                Self::BadRequest("A referenced resource does not exist or is still in use".to_string())
            }
            DatabaseError::CheckViolation { .. } => {
                Self::BadRequest("The request violates a data constraint".to_string())
            }
            DatabaseError::PoolError { .. }
            | DatabaseError::InteractionError { .. }
            | DatabaseError::QueryError { .. } => {
                // Don't expose internal database details to clients
                Self::InternalServerError
            }
        }
    }
}

/// Extension trait for `DatabaseError` to provide convenient conversion to `ApiError`
pub trait DatabaseErrorExt {
    /// Convert to `ApiError` with a custom `NotFound` message, or use default conversion
    fn or_not_found(self, message: String) -> ApiError;
}

impl DatabaseErrorExt for DatabaseError {
    fn or_not_found(self, message: String) -> ApiError {
        if self.is_not_found() {
            ApiError::NotFound(message)
        } else {
            self.into()
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        tracing::error!(error = %err, "Chat relay failed");
        match err {
            ChatError::HttpError(_) | ChatError::UpstreamStatus(_) | ChatError::EmptyReply => {
                Self::BadGateway("The assistant could not be reached".to_string())
            }
            ChatError::InternalServerError => Self::InternalServerError,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => Self::BadRequest(msg),
            StorageError::NotFound(key) => Self::NotFound(format!("Object {key} not found")),
            StorageError::Io(e) => {
                tracing::error!(error = %e, "Object storage failure");
                Self::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(ApiResponse::error(msg))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_map_to_client_statuses() {
        let missing = DatabaseError::not_found("find project");
        assert!(matches!(
            missing.or_not_found("Project 1 not found".to_string()),
            ApiError::NotFound(msg) if msg == "Project 1 not found"
        ));

        let duplicate = DatabaseError::UniqueViolation {
            operation: "assign".to_string(),
            message: "duplicate key".to_string(),
        };
        assert!(matches!(ApiError::from(duplicate), ApiError::Conflict(_)));

        let broken = DatabaseError::query_error("list", "syntax error");
        assert!(matches!(ApiError::from(broken), ApiError::InternalServerError));
    }

    #[test]
    fn chat_failures_become_bad_gateway() {
        assert!(matches!(
            ApiError::from(ChatError::UpstreamStatus(500)),
            ApiError::BadGateway(_)
        ));
        assert_eq!(
            ApiError::Forbidden("admins only".to_string())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }
}
