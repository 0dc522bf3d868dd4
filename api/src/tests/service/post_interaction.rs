use std::time::Duration;

use common::database::Ulid;
use common::prelude::FutureTimeout;
use serial_test::serial;

use crate::service::{feed, post_interaction, Error};
use crate::tests::global::{mock_global_state, reset_database, test_config};
use crate::tests::service::{create_account, create_post, likes_count, viewers_count};

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_view_post_idempotent() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;
    let post = create_post(&global, alice, "sunset").await;

    post_interaction::view_post(global.db.as_ref(), bob, post.id)
        .await
        .expect("view should succeed");
    post_interaction::view_post(global.db.as_ref(), bob, post.id)
        .await
        .expect("repeated view should be a no-op");

    assert_eq!(viewers_count(&global.db, post.id).await, 1);

    let viewers = post_interaction::get_viewers(global.db.as_ref(), post.id)
        .await
        .expect("viewers should list");
    assert_eq!(viewers.len(), 1);
    assert_eq!(viewers[0].username, "bob");

    let err = post_interaction::view_post(global.db.as_ref(), bob, Ulid::new())
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

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_like_unlike_round_trip() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;
    create_post(&global, alice, "hello").await;

    let uploaded = feed::get_uploaded_posts(global.db.as_ref(), "alice")
        .await
        .expect("uploaded posts should list");
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].caption, "hello");
    assert_eq!(uploaded[0].likes_count, 0);

    let post_id = uploaded[0].id;

    post_interaction::like_post(global.db.as_ref(), bob, post_id)
        .await
        .expect("like should succeed");
    assert_eq!(likes_count(&global.db, post_id).await, 1);

    let likers = post_interaction::get_likers(global.db.as_ref(), post_id)
        .await
        .expect("likers should list");
    assert_eq!(likers.len(), 1);
    assert_eq!(likers[0].username, "bob");

    let err = post_interaction::like_post(global.db.as_ref(), bob, post_id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyLiked));
    assert_eq!(likes_count(&global.db, post_id).await, 1);

    post_interaction::unlike_post(global.db.as_ref(), bob, post_id)
        .await
        .expect("unlike should succeed");
    assert_eq!(likes_count(&global.db, post_id).await, 0);
    assert!(post_interaction::get_likers(global.db.as_ref(), post_id)
        .await
        .expect("likers should list")
        .is_empty());

    let err = post_interaction::unlike_post(global.db.as_ref(), bob, post_id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotLiked));

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
async fn test_comments() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;
    let post = create_post(&global, alice, "sunset").await;

    let err = post_interaction::create_comment(global.db.as_ref(), post.id, bob, "  ".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let comment =
        post_interaction::create_comment(global.db.as_ref(), post.id, bob, "nice!".to_string())
            .await
            .expect("comment should succeed");
    assert_eq!(comment.content, "nice!");

    let comments = post_interaction::list_comments(global.db.as_ref(), post.id)
        .await
        .expect("comments should list");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "nice!");
    assert_eq!(comments[0].user.username, "bob");

    // Comments leave the counters alone.
    assert_eq!(likes_count(&global.db, post.id).await, 0);

    post_interaction::delete_comment(global.db.as_ref(), comment.id)
        .await
        .expect("delete should succeed");

    let err = post_interaction::delete_comment(global.db.as_ref(), comment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err =
        post_interaction::create_comment(global.db.as_ref(), Ulid::new(), bob, "hi".to_string())
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

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_viewers_of_unknown_post_is_empty() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    assert!(post_interaction::get_viewers(global.db.as_ref(), Ulid::new())
        .await
        .expect("lookup should succeed")
        .is_empty());
    assert!(post_interaction::get_likers(global.db.as_ref(), Ulid::new())
        .await
        .expect("lookup should succeed")
        .is_empty());

    drop(global);
    handler
        .cancel()
        .timeout(Duration::from_secs(1))
        .await
        .expect("failed to cancel context");
}
