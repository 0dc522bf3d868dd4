use chrono::{DateTime, Utc};
use common::database::Ulid;

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Post {
    /// The unique identifier for the post.
    pub id: Ulid,
    /// The account that uploaded the post.
    pub user_id: Ulid,
    /// Path of the image in the file store.
    pub image: String,
    /// The caption of the post.
    pub caption: String,
    /// Denormalized count of distinct viewers, kept in sync with the view
    /// edge table by the interaction service.
    pub viewers_count: i32,
    /// Denormalized count of likes, kept in sync with the like edge table.
    pub likes_count: i32,
    /// The time the post was created.
    pub created_at: DateTime<Utc>,
    /// The time the post was last updated.
    pub updated_at: DateTime<Utc>,
}
