use std::time::Duration;

use common::database::Ulid;
use common::prelude::FutureTimeout;
use serial_test::serial;

use crate::service::{social_graph, Error};
use crate::tests::global::{mock_global_state, reset_database, test_config};
use crate::tests::service::{create_account, follower_count};

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_follow_conflicts() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;

    social_graph::follow(global.db.as_ref(), alice, bob)
        .await
        .expect("follow should succeed");
    assert_eq!(follower_count(&global.db, alice).await, 1);

    // A second identical follow is a conflict and must not double-count.
    let err = social_graph::follow(global.db.as_ref(), alice, bob)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyFollowing));
    assert_eq!(follower_count(&global.db, alice).await, 1);

    social_graph::unfollow(global.db.as_ref(), alice, bob)
        .await
        .expect("unfollow should succeed");
    assert_eq!(follower_count(&global.db, alice).await, 0);

    let err = social_graph::unfollow(global.db.as_ref(), alice, bob)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFollowing));

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
async fn test_follow_guards() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;

    let err = social_graph::follow(global.db.as_ref(), alice, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = social_graph::follow(global.db.as_ref(), alice, Ulid::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = social_graph::follow(global.db.as_ref(), Ulid::new(), alice)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = social_graph::list_followers(global.db.as_ref(), "nobody")
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
async fn test_follower_listings() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let alice = create_account(&global.db, "alice").await;
    let bob = create_account(&global.db, "bob").await;
    let carol = create_account(&global.db, "carol").await;

    social_graph::follow(global.db.as_ref(), alice, bob)
        .await
        .expect("follow should succeed");
    social_graph::follow(global.db.as_ref(), alice, carol)
        .await
        .expect("follow should succeed");

    let followers = social_graph::list_followers(global.db.as_ref(), "alice")
        .await
        .expect("listing should succeed");
    assert_eq!(
        followers.iter().map(|f| f.username.as_str()).collect::<Vec<_>>(),
        vec!["bob", "carol"]
    );

    let following = social_graph::list_following(global.db.as_ref(), "bob")
        .await
        .expect("listing should succeed");
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].username, "alice");

    assert!(social_graph::list_following(global.db.as_ref(), "alice")
        .await
        .expect("listing should succeed")
        .is_empty());

    drop(global);
    handler
        .cancel()
        .timeout(Duration::from_secs(1))
        .await
        .expect("failed to cancel context");
}
