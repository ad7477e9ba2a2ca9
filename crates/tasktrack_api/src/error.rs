use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use serde::Serialize;
use tasktrack_core::{RepoError, ServiceError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error response carrying an HTTP status and a caller-facing detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub(crate) fn internal(reason: &str) -> Self {
        error!("event=request_failed module=api status=error error={reason}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        let status = match &value {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Unauthorized(_) | ServiceError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::Duplicate(_)
            | ServiceError::Validation(_)
            | ServiceError::OperationFailed(_) => StatusCode::BAD_REQUEST,
            ServiceError::TokenIssue(_) | ServiceError::Store(_) | ServiceError::Credential(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        debug!(
            "event=request_rejected module=api status={} reason=body",
            value.status().as_u16()
        );
        Self::new(value.status(), value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        debug!(
            "event=request_rejected module=api status={} reason=path",
            value.status().as_u16()
        );
        Self::new(value.status(), value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorBody {
                detail: &self.detail,
            }),
        )
            .into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use tasktrack_core::{DenyReason, EntityKind, ServiceError, SessionError};

    #[test]
    fn service_errors_map_to_statuses_and_details() {
        let cases = [
            (
                ServiceError::NotFound {
                    entity: EntityKind::Task,
                    id: 3,
                },
                StatusCode::NOT_FOUND,
                "Task not found",
            ),
            (
                ServiceError::Forbidden(DenyReason::ManagerRequired),
                StatusCode::FORBIDDEN,
                "Manager access required",
            ),
            (
                ServiceError::Forbidden(DenyReason::NotOwner),
                StatusCode::FORBIDDEN,
                "Access denied",
            ),
            (
                ServiceError::Unauthorized(SessionError::Expired),
                StatusCode::UNAUTHORIZED,
                "Invalid authentication credentials",
            ),
            (
                ServiceError::InvalidCredentials,
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ),
            (
                ServiceError::Duplicate(EntityKind::Employee),
                StatusCode::BAD_REQUEST,
                "Employee already exists",
            ),
            (
                ServiceError::OperationFailed("Failed to add time log"),
                StatusCode::BAD_REQUEST,
                "Failed to add time log",
            ),
        ];

        for (err, status, detail) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.detail(), detail);
        }
    }
}
