use common::database::Ulid;
use sqlx::PgPool;

use crate::database::Post;
use crate::global::GlobalState;
use crate::service::identity::SignupRequest;

mod feed;
mod identity;
mod post_interaction;
mod social_graph;

pub async fn create_account(db: &PgPool, username: &str) -> Ulid {
    crate::service::identity::signup(
        db,
        SignupRequest {
            username: username.to_string(),
            full_name: username.to_string(),
            email: format!("{username}@example.com"),
            password: "Password1".to_string(),
        },
    )
    .await
    .expect("failed to create account");

    let (id,): (Ulid,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(db)
        .await
        .expect("failed to fetch account");

    id
}

pub async fn create_post(global: &GlobalState, owner: Ulid, caption: &str) -> Post {
    crate::service::post_interaction::create_post(
        global.db.as_ref(),
        &global.file_store,
        owner,
        b"not really a png",
        "image/png",
        caption.to_string(),
    )
    .await
    .expect("failed to create post")
}

pub async fn likes_count(db: &PgPool, post_id: Ulid) -> i32 {
    let (count,): (i32,) = sqlx::query_as("SELECT likes_count FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(db)
        .await
        .expect("failed to fetch likes count");

    count
}

pub async fn viewers_count(db: &PgPool, post_id: Ulid) -> i32 {
    let (count,): (i32,) = sqlx::query_as("SELECT viewers_count FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(db)
        .await
        .expect("failed to fetch viewers count");

    count
}

pub async fn follower_count(db: &PgPool, user_id: Ulid) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_followers WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
        .expect("failed to fetch follower count");

    count
}
