use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use common::database::Ulid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// The unique identifier for the account.
    pub id: Ulid,
    /// The username of the account. Unique, stored lowercase.
    pub username: String,
    /// The full name of the account holder.
    pub full_name: String,
    /// The email of the account. Unique, stored lowercase.
    pub email: String,
    /// The hashed password of the account. (argon2)
    pub password_hash: String,
    /// Free-form profile bio.
    pub bio: String,
    /// One of `Male`, `Female`, `Unknown`.
    pub gender: String,
    /// Whether the profile is private.
    pub private: bool,
    /// Path of the avatar in the file store.
    pub profile_picture: Option<String>,
    /// The time the account was created.
    pub created_at: DateTime<Utc>,
    /// The time the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }

    /// Generates a new password hash using argon2.
    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("failed to hash password");

        hash.to_string()
    }

    /// Validates a username.
    pub fn validate_username(username: &str) -> Result<(), &'static str> {
        if username.len() < 3 {
            return Err("Username must be at least 3 characters long");
        }

        if username.len() > 20 {
            return Err("Username must be at most 20 characters long");
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err("Username must only contain alphanumeric characters and underscores");
        }

        Ok(())
    }

    /// Validates a password.
    pub fn validate_password(password: &str) -> Result<(), &'static str> {
        if password.len() < 8 {
            return Err("Password must be at least 8 characters long");
        }

        if password.len() > 100 {
            return Err("Password must be at most 100 characters long");
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err("Password must contain at least one lowercase character");
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err("Password must contain at least one uppercase character");
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain at least one digit");
        }

        Ok(())
    }

    /// Validates an email.
    pub fn validate_email(email: &str) -> Result<(), &'static str> {
        if email.len() < 5 {
            return Err("Email must be at least 5 characters long");
        }

        if email.len() > 100 {
            return Err("Email must be at most 100 characters long");
        }

        if !email_address::EmailAddress::is_valid(email) {
            return Err("Email is not a valid email address");
        }

        Ok(())
    }

    /// Validates a profile gender value.
    pub fn validate_gender(gender: &str) -> Result<(), &'static str> {
        match gender {
            "Male" | "Female" | "Unknown" => Ok(()),
            _ => Err("Gender must be one of Male, Female or Unknown"),
        }
    }
}
