use common::database::Ulid;
use sqlx::PgPool;

use super::{Error, Result, UserProfile};
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::config::JwtConfig;
use crate::database::User;
use crate::file_store::FileStore;

#[derive(Debug, serde::Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub gender: Option<String>,
    /// Avatar image bytes and their content type.
    pub avatar: Option<(bytes::Bytes, String)>,
}

/// Creates a new account. The email and username must both be unused.
pub async fn signup(db: &PgPool, request: SignupRequest) -> Result<()> {
    User::validate_username(&request.username).map_err(Error::InvalidInput)?;
    User::validate_password(&request.password).map_err(Error::InvalidInput)?;
    User::validate_email(&request.email).map_err(Error::InvalidInput)?;

    let username = request.username.to_lowercase();
    let email = request.email.to_lowercase();

    let taken: Option<(Ulid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&email)
            .bind(&username)
            .fetch_optional(db)
            .await?;

    if taken.is_some() {
        return Err(Error::AlreadyExists("email or username already exists"));
    }

    let res = sqlx::query(
        r#"
        INSERT INTO users (
            id,
            username,
            full_name,
            email,
            password_hash
        ) VALUES (
            $1,
            $2,
            $3,
            $4,
            $5
        )"#,
    )
    .bind(Ulid::new())
    .bind(username)
    .bind(request.full_name)
    .bind(email)
    .bind(User::hash_password(&request.password))
    .execute(db)
    .await;

    match res {
        Ok(_) => Ok(()),
        // The unique indexes are the real guard against a concurrent signup
        // racing past the pre-check above.
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Err(Error::AlreadyExists("email or username already exists"))
        }
        Err(err) => Err(err.into()),
    }
}

/// Checks the credentials against the stored argon2 hash and issues a signed
/// token for the account.
pub async fn login(db: &PgPool, jwt: &JwtConfig, request: LoginRequest) -> Result<String> {
    let ident = request.username_or_email.to_lowercase();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1 OR username = $1")
        .bind(&ident)
        .fetch_optional(db)
        .await?;

    let Some(user) = user else {
        return Err(Error::NotFound(format!(
            "account {} not found",
            request.username_or_email
        )));
    };

    if !user.verify_password(&request.password) {
        return Err(Error::AuthenticationFailed);
    }

    AuthJwtPayload::new(&user)
        .serialize(jwt)
        .ok_or(Error::Internal("failed to serialize JWT"))
}

pub async fn get_profile(db: &PgPool, username: &str) -> Result<UserProfile> {
    let profile: Option<UserProfile> = sqlx::query_as(
        r#"
        SELECT
            u.id,
            u.username,
            u.full_name,
            u.bio,
            u.profile_picture,
            (SELECT COUNT(*) FROM user_followers f WHERE f.user_id = u.id) AS followers,
            (SELECT COUNT(*) FROM user_followers f WHERE f.follower_id = u.id) AS following
        FROM
            users u
        WHERE
            u.username = $1
        "#,
    )
    .bind(username.to_lowercase())
    .fetch_optional(db)
    .await?;

    profile.ok_or_else(|| Error::NotFound(format!("account with username {username} not found")))
}

/// Updates bio, gender and/or avatar of the account. Absent fields are left
/// untouched.
pub async fn update_profile(
    db: &PgPool,
    file_store: &FileStore,
    account_id: Ulid,
    request: UpdateProfileRequest,
) -> Result<()> {
    if let Some(gender) = &request.gender {
        User::validate_gender(gender).map_err(Error::InvalidInput)?;
    }

    let avatar_path = match &request.avatar {
        Some((data, content_type)) => Some(file_store.store(data, "avatar", content_type).await?),
        None => None,
    };

    let res = sqlx::query(
        r#"
        UPDATE
            users
        SET
            bio = COALESCE($2, bio),
            gender = COALESCE($3, gender),
            profile_picture = COALESCE($4, profile_picture),
            updated_at = NOW()
        WHERE
            id = $1
        "#,
    )
    .bind(account_id)
    .bind(request.bio)
    .bind(request.gender)
    .bind(avatar_path)
    .execute(db)
    .await?;

    if res.rows_affected() == 0 {
        return Err(Error::NotFound("account could not be found".to_string()));
    }

    Ok(())
}
