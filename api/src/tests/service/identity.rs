use std::time::Duration;

use common::prelude::FutureTimeout;
use serial_test::serial;

use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::service::identity::{self, LoginRequest, SignupRequest, UpdateProfileRequest};
use crate::service::Error;
use crate::tests::global::{mock_global_state, reset_database, test_config};
use crate::tests::service::create_account;

fn signup_request(username: &str, email: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        full_name: "Test User".to_string(),
        email: email.to_string(),
        password: "Password1".to_string(),
    }
}

fn login_request(username_or_email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username_or_email: username_or_email.to_string(),
        password: password.to_string(),
    }
}

#[serial]
#[ignore = "requires a running postgres, set DATABASE_URL"]
#[tokio::test]
async fn test_signup_and_login() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    identity::signup(global.db.as_ref(), signup_request("alice", "alice@x.com"))
        .await
        .expect("signup should succeed");

    // Same email, different username.
    let err = identity::signup(global.db.as_ref(), signup_request("alice2", "alice@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    // Same username, different email.
    let err = identity::signup(global.db.as_ref(), signup_request("alice", "alice2@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    let token = identity::login(
        global.db.as_ref(),
        &global.config.jwt,
        login_request("alice", "Password1"),
    )
    .await
    .expect("login should succeed");
    assert!(!token.is_empty());

    let payload = AuthJwtPayload::verify(&global.config.jwt, &token).expect("token should verify");
    assert_eq!(payload.username, "alice");

    // Login by email resolves the same account.
    identity::login(
        global.db.as_ref(),
        &global.config.jwt,
        login_request("alice@x.com", "Password1"),
    )
    .await
    .expect("login by email should succeed");

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
async fn test_login_failures() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    identity::signup(global.db.as_ref(), signup_request("alice", "alice@x.com"))
        .await
        .expect("signup should succeed");

    let err = identity::login(
        global.db.as_ref(),
        &global.config.jwt,
        login_request("alice", "WrongPassword1"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));

    let err = identity::login(
        global.db.as_ref(),
        &global.config.jwt,
        login_request("nobody", "Password1"),
    )
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
async fn test_profile_update() {
    let (global, handler) = mock_global_state(test_config()).await;
    reset_database(&global.db).await;

    let bob = create_account(&global.db, "bob").await;

    let profile = identity::get_profile(global.db.as_ref(), "bob")
        .await
        .expect("profile should exist");
    assert_eq!(profile.followers, 0);
    assert_eq!(profile.following, 0);
    assert_eq!(profile.bio, "");

    identity::update_profile(
        global.db.as_ref(),
        &global.file_store,
        bob,
        UpdateProfileRequest {
            bio: Some("hello there".to_string()),
            gender: Some("Male".to_string()),
            avatar: None,
        },
    )
    .await
    .expect("update should succeed");

    let profile = identity::get_profile(global.db.as_ref(), "bob")
        .await
        .expect("profile should exist");
    assert_eq!(profile.bio, "hello there");

    let err = identity::update_profile(
        global.db.as_ref(),
        &global.file_store,
        bob,
        UpdateProfileRequest {
            gender: Some("robot".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = identity::get_profile(global.db.as_ref(), "nobody")
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
