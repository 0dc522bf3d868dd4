use common::http::RouteError;
use hyper::StatusCode;

use super::auth::AuthError;
use crate::file_store::UploadError;
use crate::service;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to parse http body: {0}")]
    ParseHttpBody(#[from] hyper::Error),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Service(#[from] service::Error),
}

impl From<service::Error> for RouteError<ApiError> {
    #[track_caller]
    fn from(err: service::Error) -> Self {
        use service::Error;

        let (status, kind) = match &err {
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            Error::AlreadyFollowing => (StatusCode::CONFLICT, "already_following"),
            Error::NotFollowing => (StatusCode::CONFLICT, "not_following"),
            Error::AlreadyLiked => (StatusCode::CONFLICT, "already_liked"),
            Error::NotLiked => (StatusCode::CONFLICT, "not_liked"),
            Error::AuthenticationFailed => (StatusCode::UNAUTHORIZED, "authentication_failed"),
            Error::Upload(UploadError::UnsupportedFormat(_)) => {
                (StatusCode::BAD_REQUEST, "upload_error")
            }
            Error::Upload(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upload_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        };

        // Server-side failures get a generic client message; the source error
        // stays attached for the log line.
        let message = match &err {
            Error::Database(_) => "database error".to_string(),
            Error::Internal(_) => "internal server error".to_string(),
            Error::Upload(UploadError::Io(_)) => "failed to store file".to_string(),
            _ => err.to_string(),
        };

        RouteError::new(status, kind, message).with_source(Some(ApiError::Service(err)))
    }
}
