use chrono::{DateTime, Utc};
use common::database::Ulid;

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Comment {
    /// The unique identifier for the comment.
    pub id: Ulid,
    /// The post the comment is on.
    pub post_id: Ulid,
    /// The account that wrote the comment.
    pub user_id: Ulid,
    /// The comment text.
    pub content: String,
    /// The time the comment was created.
    pub created_at: DateTime<Utc>,
}
