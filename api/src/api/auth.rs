use std::sync::Arc;

use common::database::Ulid;
use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use super::jwt::AuthJwtPayload;
use crate::database::User;
use crate::global::GlobalState;

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
    #[error("token must be ascii only")]
    HeaderToStr,
    #[error("token must be a bearer token")]
    NotBearerToken,
    /// The caller is not logged in
    #[error("not logged in")]
    NotLoggedIn,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to fetch account")]
    FetchAccount,
    #[error("account not found")]
    AccountNotFound,
}

impl From<AuthError> for RouteError<ApiError> {
    #[track_caller]
    fn from(value: AuthError) -> Self {
        RouteError::from(match &value {
            AuthError::HeaderToStr => (StatusCode::BAD_REQUEST, "token must be ascii only"),
            AuthError::NotBearerToken => (StatusCode::BAD_REQUEST, "token must be a bearer token"),
            AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "not logged in"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::FetchAccount => {
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch account")
            }
            // The token was valid but the account is gone; to the caller it
            // is the same as an invalid token.
            AuthError::AccountNotFound => (StatusCode::UNAUTHORIZED, "invalid token"),
        })
        .with_source(Some(ApiError::Auth(value)))
    }
}

/// The authenticated caller, resolved by the auth middleware and threaded
/// through the request context to every handler that needs an actor.
#[derive(Debug, Clone)]
pub struct AuthData {
    pub account_id: Ulid,
    pub username: String,
}

impl AuthData {
    pub async fn from_jwt(global: &Arc<GlobalState>, jwt: &AuthJwtPayload) -> Result<Self, AuthError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(jwt.user_id)
            .fetch_optional(global.db.as_ref())
            .await
            .map_err(|_| AuthError::FetchAccount)?;

        let user = user.ok_or(AuthError::AccountNotFound)?;

        Ok(Self {
            account_id: user.id,
            username: user.username,
        })
    }
}
