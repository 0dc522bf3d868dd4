use std::time::Duration;

use common::prelude::FutureTimeout;
use serial_test::serial;

use crate::service::{feed, post_interaction, Error};
use crate::tests::global::{mock_global_state, reset_database, test_config};
use crate::tests::service::{create_account, create_post};

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_feed_cold_start_popularity_fallback() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let v1 = create_account(&global.db, "viewer1").await;
    let v2 = create_account(&global.db, "viewer2").await;
    let v3 = create_account(&global.db, "viewer3").await;

    let mut posts = Vec::new();
    for i in 0..12 {
        posts.push(create_post(&global, alice, &format!("post {i}")).await);
    }

    // posts[0] gets three views, posts[1] two, posts[2] one.
    for viewer in [v1, v2, v3] {
        post_interaction::view_post(global.db.as_ref(), viewer, posts[0].id)
            .await
            .expect("view should succeed");
    }
    for viewer in [v1, v2] {
        post_interaction::view_post(global.db.as_ref(), viewer, posts[1].id)
            .await
            .expect("view should succeed");
    }
    post_interaction::view_post(global.db.as_ref(), v1, posts[2].id)
        .await
        .expect("view should succeed");

    // A brand-new account has no view history and gets the popularity
    // fallback, capped at 10 of the 12 posts.
    let newbie = create_account(&global.db, "newbie").await;
    let cold_feed = feed::get_feed(global.db.as_ref(), newbie)
        .await
        .expect("feed should succeed");

    assert_eq!(cold_feed.len(), 10);
    assert_eq!(cold_feed[0].id, posts[0].id);
    assert_eq!(cold_feed[1].id, posts[1].id);
    assert_eq!(cold_feed[2].id, posts[2].id);
    assert!(cold_feed
        .windows(2)
        .all(|w| w[0].viewers_count >= w[1].viewers_count));

    drop(global);
    handler
        .cancel()
        .timeout(Duration::from_secs(1))
        .await
        .expect("failed to cancel context");
}

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_feed_personalized() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;

    let seen = create_post(&global, alice, "seen").await;
    create_post(&global, alice, "unseen").await;

    post_interaction::view_post(global.db.as_ref(), bob, seen.id)
        .await
        .expect("view should succeed");

    // With history the feed is exactly the viewed posts, no fallback mixed
    // in.
    let personalized = feed::get_feed(global.db.as_ref(), bob)
        .await
        .expect("feed should succeed");
    assert_eq!(personalized.len(), 1);
    assert_eq!(personalized[0].id, seen.id);
    assert_eq!(personalized[0].user.username, "alice");

    drop(global);
    handler
        .cancel()
        .timeout(Duration::from_secs(1))
        .await
        .expect("failed to cancel context");
}

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_per_user_post_listings() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;

    let first = create_post(&global, alice, "first").await;
    let second = create_post(&global, alice, "second").await;

    post_interaction::view_post(global.db.as_ref(), bob, first.id)
        .await
        .expect("view should succeed");
    post_interaction::like_post(global.db.as_ref(), bob, second.id)
        .await
        .expect("like should succeed");

    let uploaded = feed::get_uploaded_posts(global.db.as_ref(), "alice")
        .await
        .expect("uploaded should list");
    assert_eq!(uploaded.len(), 2);

    let viewed = feed::get_viewed_posts(global.db.as_ref(), "bob")
        .await
        .expect("viewed should list");
    assert_eq!(viewed.len(), 1);
    assert_eq!(viewed[0].id, first.id);

    let liked = feed::get_liked_posts(global.db.as_ref(), "bob")
        .await
        .expect("liked should list");
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, second.id);

    assert!(feed::get_liked_posts(global.db.as_ref(), "alice")
        .await
        .expect("liked should list")
        .is_empty());

    let err = feed::get_uploaded_posts(global.db.as_ref(), "nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    drop(global);
    handler
        .cancel()
        .timeout(Duration::from_secs(1))
        .await
        .expect("failed to cancel context");
}
