use crate::file_store::UploadError;

/// The failure taxonomy every service operation reports. The HTTP boundary
/// maps each kind to a status code and the client error envelope.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input.
    #[error("{0}")]
    InvalidInput(&'static str),
    /// A referenced account, post or comment does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Signup with an email or username that is already taken.
    #[error("{0}")]
    AlreadyExists(&'static str),
    #[error("you are already following this account")]
    AlreadyFollowing,
    #[error("you are not following this account")]
    NotFollowing,
    #[error("you have already liked this post")]
    AlreadyLiked,
    #[error("you have not liked this post")]
    NotLiked,
    /// Credential mismatch on login.
    #[error("invalid credentials")]
    AuthenticationFailed,
    #[error("{0}")]
    Internal(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Upload(#[from] UploadError),
}
