//! Request context, e.g. user id, its role, etc.
//!

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: uuid::Uuid,
    user_role: UserRole,
}

impl AuthenticatedUser {
    pub fn new(user_id: uuid::Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    /// Actor used by the service itself (session lookup, CLI seeding).
    pub fn system() -> Self {
        Self {
            user_role: UserRole::Admin,
            user_id: uuid::Uuid::max(),
        }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.user_id
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }

    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    maybe_user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(maybe_user: Option<AuthenticatedUser>) -> Self {
        Self { maybe_user }
    }

    pub fn maybe_user(&self) -> Option<&AuthenticatedUser> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> WebResult<&AuthenticatedUser> {
        self.maybe_user.as_ref().ok_or(WebError::auth_required())
    }

    /// Every dashboard screen is admin-only.
    pub fn admin(&self) -> WebResult<&AuthenticatedUser> {
        let user = self.user()?;
        if !user.is_admin() {
            return Err(WebError::auth_admin_required());
        }
        Ok(user)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>();
        if let Some(ctx) = ctx {
            Ok(ctx.clone())
        } else {
            Ok(RequestContext::new(None))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn admin_check() {
        let anonymous = RequestContext::new(None);
        let err = anonymous.admin().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let learner = RequestContext::new(Some(AuthenticatedUser::new(
            uuid::Uuid::new_v4(),
            UserRole::User,
        )));
        let err = learner.admin().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let admin = RequestContext::new(Some(AuthenticatedUser::new(
            uuid::Uuid::new_v4(),
            UserRole::Admin,
        )));
        assert!(admin.admin().is_ok());
    }

    #[test]
    fn unknown_roles_are_plain_users() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("moderator"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
