use common::database::Ulid;
use sqlx::PgPool;

use super::{account_id_by_username, ensure_account, Error, Result, UserPreview};

/// Makes `follower_id` follow `followed_id`. Fails when either account is
/// missing, on self-follows, and when the edge already exists.
pub async fn follow(db: &PgPool, followed_id: Ulid, follower_id: Ulid) -> Result<()> {
    if followed_id == follower_id {
        return Err(Error::InvalidInput("you cannot follow yourself"));
    }

    let mut tx = db.begin().await?;

    ensure_account(&mut tx, followed_id).await?;
    ensure_account(&mut tx, follower_id).await?;

    // The composite primary key on the edge table settles the race between
    // two identical concurrent requests; the conditional insert reports
    // which one won.
    let res = sqlx::query(
        "INSERT INTO user_followers (user_id, follower_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(followed_id)
    .bind(follower_id)
    .execute(&mut *tx)
    .await?;

    if res.rows_affected() == 0 {
        // Dropping the transaction rolls it back.
        return Err(Error::AlreadyFollowing);
    }

    tx.commit().await?;

    Ok(())
}

/// Mirror of [`follow`]: removes the edge, failing when it does not exist.
pub async fn unfollow(db: &PgPool, followed_id: Ulid, follower_id: Ulid) -> Result<()> {
    let mut tx = db.begin().await?;

    ensure_account(&mut tx, followed_id).await?;
    ensure_account(&mut tx, follower_id).await?;

    let res = sqlx::query("DELETE FROM user_followers WHERE user_id = $1 AND follower_id = $2")
        .bind(followed_id)
        .bind(follower_id)
        .execute(&mut *tx)
        .await?;

    if res.rows_affected() == 0 {
        return Err(Error::NotFollowing);
    }

    tx.commit().await?;

    Ok(())
}

pub async fn list_followers(db: &PgPool, username: &str) -> Result<Vec<UserPreview>> {
    let user_id = account_id_by_username(db, username).await?;

    let followers: Vec<UserPreview> = sqlx::query_as(
        r#"
        SELECT
            u.id,
            u.username,
            u.profile_picture
        FROM
            user_followers f
        JOIN
            users u ON u.id = f.follower_id
        WHERE
            f.user_id = $1
        ORDER BY
            f.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(followers)
}

pub async fn list_following(db: &PgPool, username: &str) -> Result<Vec<UserPreview>> {
    let follower_id = account_id_by_username(db, username).await?;

    let following: Vec<UserPreview> = sqlx::query_as(
        r#"
        SELECT
            u.id,
            u.username,
            u.profile_picture
        FROM
            user_followers f
        JOIN
            users u ON u.id = f.user_id
        WHERE
            f.follower_id = $1
        ORDER BY
            f.created_at
        "#,
    )
    .bind(follower_id)
    .fetch_all(db)
    .await?;

    Ok(following)
}
