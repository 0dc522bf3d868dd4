use chrono::{DateTime, Utc};
use common::database::Ulid;
use sqlx::postgres::PgRow;
use sqlx::Row;

pub mod error;
pub mod feed;
pub mod identity;
pub mod post_interaction;
pub mod social_graph;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Minimal projection of an account used in listings.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct UserPreview {
    pub id: Ulid,
    pub username: String,
    pub profile_picture: Option<String>,
}

/// A post joined with a preview of its owner.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostWithUser {
    pub id: Ulid,
    pub image: String,
    pub caption: String,
    pub viewers_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub user: UserPreview,
}

impl<'r> sqlx::FromRow<'r, PgRow> for PostWithUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            image: row.try_get("image")?,
            caption: row.try_get("caption")?,
            viewers_count: row.try_get("viewers_count")?,
            likes_count: row.try_get("likes_count")?,
            created_at: row.try_get("created_at")?,
            user: UserPreview {
                id: row.try_get("user_id")?,
                username: row.try_get("user_username")?,
                profile_picture: row.try_get("user_profile_picture")?,
            },
        })
    }
}

/// A comment joined with a preview of its author.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommentWithUser {
    pub id: Ulid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: UserPreview,
}

impl<'r> sqlx::FromRow<'r, PgRow> for CommentWithUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            user: UserPreview {
                id: row.try_get("user_id")?,
                username: row.try_get("user_username")?,
                profile_picture: row.try_get("user_profile_picture")?,
            },
        })
    }
}

/// Profile projection with follower/following counts.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct UserProfile {
    pub id: Ulid,
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub followers: i64,
    pub following: i64,
}

pub(crate) async fn account_id_by_username(db: &sqlx::PgPool, username: &str) -> Result<Ulid> {
    let id: Option<(Ulid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username.to_lowercase())
        .fetch_optional(db)
        .await?;

    id.map(|(id,)| id)
        .ok_or_else(|| Error::NotFound(format!("account with username {username} not found")))
}

pub(crate) async fn ensure_account(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Ulid,
) -> Result<()> {
    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    if exists.is_none() {
        return Err(Error::NotFound(format!("account with id {id} not found")));
    }

    Ok(())
}

pub(crate) async fn ensure_post(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Ulid,
) -> Result<()> {
    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    if exists.is_none() {
        return Err(Error::NotFound(format!("post with id {id} not found")));
    }

    Ok(())
}
