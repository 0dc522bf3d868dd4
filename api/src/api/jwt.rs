use chrono::{DateTime, Months, TimeZone, Utc};
use common::database::Ulid;
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::JwtConfig;
use crate::database::User;

pub struct AuthJwtPayload {
    pub user_id: Ulid,
    pub username: String,
    pub expiration: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
}

impl AuthJwtPayload {
    /// Tokens are valid for one month from issuance.
    pub fn new(user: &User) -> Self {
        let now = Utc::now();

        Self {
            user_id: user.id,
            username: user.username.clone(),
            expiration: Some(now + Months::new(1)),
            issued_at: now,
        }
    }
}

pub trait JwtState: Sized {
    fn to_claims(&self) -> Claims;

    fn from_claims(claims: &Claims) -> Option<Self>;

    fn serialize(&self, config: &JwtConfig) -> Option<String> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let mut claims = self.to_claims();

        claims.registered.issuer = Some(config.issuer.clone());

        if claims.registered.issued_at.is_none() {
            claims.registered.issued_at = Some(Utc::now().timestamp() as u64);
        }

        claims.sign_with_key(&key).ok()
    }

    fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

        let claims = token.claims();

        if claims.registered.issuer.as_ref() != Some(&config.issuer) {
            return None;
        }

        let iat = Utc.timestamp_opt(claims.registered.issued_at? as i64, 0).single()?;
        if iat > Utc::now() {
            return None;
        }

        let exp = claims
            .registered
            .expiration
            .and_then(|x| Utc.timestamp_opt(x as i64, 0).single());
        if let Some(exp) = exp {
            if exp < Utc::now() {
                return None;
            }
        }

        Self::from_claims(claims)
    }
}

impl JwtState for AuthJwtPayload {
    fn to_claims(&self) -> Claims {
        let mut claims = Claims {
            registered: RegisteredClaims {
                issuer: None,
                subject: Some(self.user_id.to_string()),
                audience: None,
                expiration: self.expiration.map(|x| x.timestamp() as u64),
                not_before: None,
                issued_at: Some(self.issued_at.timestamp() as u64),
                json_web_token_id: None,
            },
            private: Default::default(),
        };

        claims.private.insert(
            "username".to_string(),
            serde_json::Value::String(self.username.clone()),
        );

        claims
    }

    fn from_claims(claims: &Claims) -> Option<Self> {
        Some(Self {
            user_id: claims
                .registered
                .subject
                .as_ref()
                .and_then(|x| Ulid::from_string(x).ok())?,
            username: claims.private.get("username")?.as_str()?.to_string(),
            expiration: claims
                .registered
                .expiration
                .and_then(|x| Utc.timestamp_opt(x as i64, 0).single()),
            issued_at: Utc.timestamp_opt(claims.registered.issued_at? as i64, 0).single()?,
        })
    }
}
