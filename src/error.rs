// HTTP boundary error type. Every error the service can surface funnels
// through this enum and out as the uniform JSON envelope:
//
//   { "status": "400 BAD_REQUEST", "title": ..., "detail": ...,
//     "errors": [ { "object_name", "field", "message" }, ... ] }
//
// `title` and `detail` are omitted when absent; `errors` is always present.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::domain::{DomainError, FieldViolation};
use crate::store::StoreError;

/// One field-level violation entry in the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFieldError {
    pub object_name: String,
    pub field: String,
    pub message: String,
}

impl From<FieldViolation> for ApiFieldError {
    fn from(violation: FieldViolation) -> Self {
        Self {
            object_name: violation.object_name,
            field: violation.field,
            message: violation.message,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(Vec<ApiFieldError>),
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized { title: String, detail: String },

    // 403 Forbidden
    Forbidden { title: String, detail: String },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn validation(violations: Vec<ApiFieldError>) -> Self {
        let mut violations = violations;
        // Deterministic error order regardless of discovery order.
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        ApiError::Validation(violations)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn unauthorized(title: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden {
            title: "access_denied".to_string(),
            detail: "Access is denied".to_string(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(detail.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the envelope body for this error.
    pub fn body(&self) -> ErrorBody {
        let status = status_label(self.status_code());
        match self {
            ApiError::Validation(errors) => ErrorBody {
                status,
                title: None,
                detail: None,
                errors: errors.clone(),
            },
            ApiError::BadRequest(detail) => ErrorBody {
                status,
                title: None,
                detail: Some(detail.clone()),
                errors: Vec::new(),
            },
            ApiError::Unauthorized { title, detail } | ApiError::Forbidden { title, detail } => {
                ErrorBody {
                    status,
                    title: Some(title.clone()),
                    detail: Some(detail.clone()),
                    errors: Vec::new(),
                }
            }
            ApiError::NotFound(detail) => ErrorBody {
                status,
                title: None,
                detail: Some(detail.clone()),
                errors: Vec::new(),
            },
            // Never leak internal details to clients.
            ApiError::Internal(_) => ErrorBody {
                status,
                title: None,
                detail: Some("An unexpected error occurred".to_string()),
                errors: Vec::new(),
            },
        }
    }
}

/// JSON shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub errors: Vec<ApiFieldError>,
}

/// Render a status as `"<code> <CONSTANT_CASE reason>"`, e.g. `400 BAD_REQUEST`.
fn status_label(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!(
            "{} {}",
            status.as_u16(),
            reason.to_uppercase().replace(' ', "_")
        ),
        None => status.as_u16().to_string(),
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(violations) => {
                ApiError::validation(violations.into_iter().map(ApiFieldError::from).collect())
            }
            // Linking unsaved entities is a programming error by the time it
            // reaches the HTTP boundary; handlers resolve endpoints first.
            DomainError::Unsaved(kind) => {
                ApiError::internal(format!("attempted to link unsaved {kind}"))
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, id } => ApiError::not_found(format!("{kind} {id} not found")),
            StoreError::DanglingEdge { kind, id } => {
                ApiError::internal(format!("edge references missing {kind} {id}"))
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "validation failed ({} fields)", errors.len()),
            ApiError::BadRequest(detail) => write!(f, "{detail}"),
            ApiError::Unauthorized { detail, .. } => write!(f, "{detail}"),
            ApiError::Forbidden { detail, .. } => write!(f, "{detail}"),
            ApiError::NotFound(detail) => write!(f, "{detail}"),
            ApiError::Internal(detail) => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("unexpected error: {detail}");
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
