use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

/// Header carrying the signed-in user's id, set by the external auth provider.
pub const USER_ID_HEADER: &str = "x-auth-user-id";
/// Header carrying the signed-in user's email, when the provider knows it.
pub const USER_EMAIL_HEADER: &str = "x-auth-user-email";

/// The signed-in user, as asserted by the auth provider in front of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER).ok_or(AppError::Unauthorized)?;
        Ok(Session {
            user_id,
            email: header_value(parts, USER_EMAIL_HEADER),
        })
    }
}
