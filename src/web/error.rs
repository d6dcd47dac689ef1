use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    error::log_error,
    forms::{FieldError, richtext::RichTextError},
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationTokenInvalid, source: {source_name}. Error: {reason}")]
    AuthenticationTokenInvalid {
        source_name: &'static str,
        reason: String,
    },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationAdminRequired")]
    AuthenticationAdminRequired,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceConflict: {resource_type:?}. Error: {error}")]
    ResourceConflict {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceMissingParent: {resource_type:?}. Error: {error}")]
    ResourceMissingParent {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. {message}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("ValidationFailed: {resource_type:?}, {} field(s)", .errors.len())]
    ValidationFailed {
        resource_type: ResourceType,
        errors: Vec<FieldError>,
    },

    #[error("ValidationRichText: {0}")]
    ValidationRichText(#[from] RichTextError),
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationTokenInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationAdminRequired => StatusCode::FORBIDDEN,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationTokenInvalid { .. } => {
                String::from("Authentication error, session token invalid.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationAdminRequired => {
                String::from("Authentication error, administrator role required.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceConflict { .. } => StatusCode::CONFLICT,
            Self::ResourceMissingParent { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { resource_type } => {
                format!("Resource error, {} not found.", resource_type.label())
            }
            Self::ResourceConflict { resource_type, .. } => {
                format!("Resource error, {} already exists.", resource_type.label())
            }
            Self::ResourceMissingParent { resource_type, .. } => format!(
                "Resource error, the {} points to a missing record or is still referenced.",
                resource_type.label()
            ),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceBadRequest { message, .. } => format!("Resource error, {message}."),
        }
    }
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ValidationFailed { resource_type, .. } => {
                format!("Unable to save {}, check the highlighted fields.", resource_type.label())
            }
            Self::ValidationRichText(e) => format!("Unable to format text, {e}."),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("ValidationError - {0}")]
    ValidationError(#[from] ValidationError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    /// Maps constraint violations raised while saving a record onto client
    /// errors; anything else stays a server error.
    pub fn from_db(r#type: ResourceType, error: DatabaseError) -> Self {
        if error.is_unique_violation() {
            Self::ResourceError(ResourceError::ResourceConflict {
                resource_type: r#type,
                error,
            })
        } else if error.is_foreign_key_violation() {
            Self::ResourceError(ResourceError::ResourceMissingParent {
                resource_type: r#type,
                error,
            })
        } else {
            Self::resource_fetch_error(r#type, error)
        }
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, message: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            message: message.into(),
        })
    }

    pub fn validation(r#type: ResourceType, errors: Vec<FieldError>) -> Self {
        Self::ValidationError(ValidationError::ValidationFailed {
            resource_type: r#type,
            errors,
        })
    }

    pub fn auth_token_invalid<S: ToString>(source_name: &'static str, reason: S) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationTokenInvalid {
            source_name,
            reason: reason.to_string(),
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_admin_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationAdminRequired)
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::ValidationError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::ValidationError(e) => e.client_display(),
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationError(ValidationError::ValidationFailed { errors, .. }) => errors,
            _ => &[],
        }
    }
}

impl From<RichTextError> for WebError {
    fn from(value: RichTextError) -> Self {
        Self::ValidationError(ValidationError::ValidationRichText(value))
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
    /// Per-field problems of a rejected form
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<&WebError> for ErrorResponse {
    fn from(error: &WebError) -> Self {
        Self {
            message: error.client_display(),
            status_code: error.status_code().as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(error.to_string())
            } else {
                None
            },
            errors: error.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let body = ErrorResponse::from(&self);
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation_errors_are_listed() {
        let err = WebError::validation(
            ResourceType::Course,
            vec![FieldError::new("title", "title is required")],
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["status_code"], "400");
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["message"], "title is required");
        assert!(body["message"].as_str().unwrap().contains("course"));
    }

    #[test]
    fn non_validation_errors_omit_field_list() {
        let err = WebError::resource_not_found(ResourceType::Lesson);
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["status_code"], "404");
        assert!(body.get("errors").is_none());
        assert_eq!(body["message"], "Resource error, lesson not found.");
    }

    #[test]
    fn unclassified_database_errors_are_server_errors() {
        let err = WebError::from_db(
            ResourceType::Word,
            DatabaseError::SqlxError(sqlx::Error::RowNotFound),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rich_text_errors_are_bad_requests() {
        let err = WebError::from(RichTextError::NoSelection);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_display(), "Unable to format text, no element focused.");
    }
}
