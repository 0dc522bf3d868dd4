use common::database::Ulid;
use sqlx::PgPool;

use super::{account_id_by_username, PostWithUser, Result};

/// The personalized feed: every post the viewer has a view edge for. A
/// viewer with no history gets the globally most viewed posts instead,
/// capped at 10.
pub async fn get_feed(db: &PgPool, viewer_id: Ulid) -> Result<Vec<PostWithUser>> {
    let viewed: Vec<PostWithUser> = sqlx::query_as(
        r#"
        SELECT
            p.id,
            p.image,
            p.caption,
            p.viewers_count,
            p.likes_count,
            p.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            post_views v
        JOIN
            posts p ON p.id = v.post_id
        JOIN
            users u ON u.id = p.user_id
        WHERE
            v.user_id = $1
        "#,
    )
    .bind(viewer_id)
    .fetch_all(db)
    .await?;

    if !viewed.is_empty() {
        return Ok(viewed);
    }

    // Cold start: no view history yet.
    let popular: Vec<PostWithUser> = sqlx::query_as(
        r#"
        SELECT
            p.id,
            p.image,
            p.caption,
            p.viewers_count,
            p.likes_count,
            p.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            posts p
        JOIN
            users u ON u.id = p.user_id
        ORDER BY
            p.viewers_count DESC
        LIMIT 10
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(popular)
}

pub async fn get_uploaded_posts(db: &PgPool, username: &str) -> Result<Vec<PostWithUser>> {
    let user_id = account_id_by_username(db, username).await?;

    let posts: Vec<PostWithUser> = sqlx::query_as(
        r#"
        SELECT
            p.id,
            p.image,
            p.caption,
            p.viewers_count,
            p.likes_count,
            p.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            posts p
        JOIN
            users u ON u.id = p.user_id
        WHERE
            p.user_id = $1
        ORDER BY
            p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(posts)
}

pub async fn get_viewed_posts(db: &PgPool, username: &str) -> Result<Vec<PostWithUser>> {
    let user_id = account_id_by_username(db, username).await?;

    let posts: Vec<PostWithUser> = sqlx::query_as(
        r#"
        SELECT
            p.id,
            p.image,
            p.caption,
            p.viewers_count,
            p.likes_count,
            p.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            post_views v
        JOIN
            posts p ON p.id = v.post_id
        JOIN
            users u ON u.id = p.user_id
        WHERE
            v.user_id = $1
        ORDER BY
            v.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(posts)
}

pub async fn get_liked_posts(db: &PgPool, username: &str) -> Result<Vec<PostWithUser>> {
    let user_id = account_id_by_username(db, username).await?;

    let posts: Vec<PostWithUser> = sqlx::query_as(
        r#"
        SELECT
            p.id,
            p.image,
            p.caption,
            p.viewers_count,
            p.likes_count,
            p.created_at,
            u.id AS user_id,
            u.username AS user_username,
            u.profile_picture AS user_profile_picture
        FROM
            post_likes l
        JOIN
            posts p ON p.id = l.post_id
        JOIN
            users u ON u.id = p.user_id
        WHERE
            l.user_id = $1
        ORDER BY
            l.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(posts)
}
