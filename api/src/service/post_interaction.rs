use common::database::Ulid;
use sqlx::PgPool;

use super::{ensure_account, ensure_post, CommentWithUser, Error, Result, UserPreview};
use crate::database::{Comment, Post};
use crate::file_store::FileStore;

/// Stores the image and inserts the post with zeroed counters.
pub async fn create_post(
    db: &PgPool,
    file_store: &FileStore,
    owner_id: Ulid,
    image: &[u8],
    content_type: &str,
    caption: String,
) -> Result<Post> {
    let path = file_store.store(image, "post", content_type).await?;

    let post: Post = sqlx::query_as(
        r#"
        INSERT INTO posts (
            id,
            user_id,
            image,
            caption
        ) VALUES (
            $1,
            $2,
            $3,
            $4
        ) RETURNING *
        "#,
    )
    .bind(Ulid::new())
    .bind(owner_id)
    .bind(path)
    .bind(caption)
    .fetch_one(db)
    .await?;

    Ok(post)
}

/// Records that `viewer_id` saw `post_id`. The first call per pair inserts
/// the view edge and bumps the counter; any repeat is a committed no-op, so
/// a post is never counted twice for the same viewer.
pub async fn view_post(db: &PgPool, viewer_id: Ulid, post_id: Ulid) -> Result<()> {
    let mut tx = db.begin().await?;

    ensure_account(&mut tx, viewer_id).await?;
    ensure_post(&mut tx, post_id).await?;

    let res = sqlx::query(
        "INSERT INTO post_views (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(viewer_id)
    .bind(post_id)
    .execute(&mut *tx)
    .await?;

    // The counter moves only when the edge write actually changed a row,
    // inside the same transaction, so it cannot drift from the edge table.
    if res.rows_affected() == 1 {
        sqlx::query("UPDATE posts SET viewers_count = viewers_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(())
}

pub async fn like_post(db: &PgPool, liker_id: Ulid, post_id: Ulid) -> Result<()> {
    let mut tx = db.begin().await?;

    ensure_account(&mut tx, liker_id).await?;
    ensure_post(&mut tx, post_id).await?;

    let res = sqlx::query(
        "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(liker_id)
    .bind(post_id)
    .execute(&mut *tx)
    .await?;

    if res.rows_affected() == 0 {
        return Err(Error::AlreadyLiked);
    }

    sqlx::query("UPDATE posts SET likes_count = likes_count + 1 WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

pub async fn unlike_post(db: &PgPool, liker_id: Ulid, post_id: Ulid) -> Result<()> {
    let mut tx = db.begin().await?;

    ensure_account(&mut tx, liker_id).await?;
    ensure_post(&mut tx, post_id).await?;

    let res = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
        .bind(liker_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    if res.rows_affected() == 0 {
        return Err(Error::NotLiked);
    }

    sqlx::query("UPDATE posts SET likes_count = likes_count - 1 WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Accounts that viewed the post, oldest view first. An unknown post id
/// yields an empty list rather than an error.
pub async fn get_viewers(db: &PgPool, post_id: Ulid) -> Result<Vec<UserPreview>> {
    let viewers: Vec<UserPreview> = sqlx::query_as(
        r#"
        SELECT
            u.id,
            u.username,
            u.profile_picture
        FROM
            post_views v
        JOIN
            users u ON u.id = v.user_id
        WHERE
            v.post_id = $1
        ORDER BY
            v.created_at
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;

    Ok(viewers)
}

/// Accounts that like the post, oldest like first. An unknown post id yields
/// an empty list rather than an error.
pub async fn get_likers(db: &PgPool, post_id: Ulid) -> Result<Vec<UserPreview>> {
    let likers: Vec<UserPreview> = sqlx::query_as(
        r#"
        SELECT
            u.id,
            u.username,
            u.profile_picture
        FROM
            post_likes l
        JOIN
            users u ON u.id = l.user_id
        WHERE
            l.post_id = $1
        ORDER BY
            l.created_at
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;

    Ok(likers)
}

pub async fn create_comment(
    db: &PgPool,
    post_id: Ulid,
    author_id: Ulid,
    content: String,
) -> Result<Comment> {
    if content.trim().is_empty() {
        return Err(Error::InvalidInput("comment must not be empty"));
    }

    let mut tx = db.begin().await?;

    ensure_post(&mut tx, post_id).await?;
    ensure_account(&mut tx, author_id).await?;

    let comment: Comment = sqlx::query_as(
        r#"
        INSERT INTO comments (
            id,
            post_id,
            user_id,
            content
        ) VALUES (
            $1,
            $2,
            $3,
            $4
        ) RETURNING *
        "#,
    )
    .bind(Ulid::new())
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(comment)
}

pub async fn delete_comment(db: &PgPool, comment_id: Ulid) -> Result<()> {
    let res = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(db)
        .await?;

    if res.rows_affected() == 0 {
        return Err(Error::NotFound("comment not found".to_string()));
    }

    Ok(())
}

pub async fn list_comments(db: &PgPool, post_id: Ulid) -> Result<Vec<CommentWithUser>> {
    let comments: Vec<CommentWithUser> = sqlx::query_as(
        r#"
        SELECT
            c.id,
            c.content,
            c.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            comments c
        JOIN
            users u ON u.id = c.user_id
        WHERE
            c.post_id = $1
        ORDER BY
            c.created_at
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;

    Ok(comments)
}
