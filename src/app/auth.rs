use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use pasetors::claims::{Claims, ClaimsValidationRules};
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::{local, version4::V4, Local};
use sqlx::Row;
use std::time::Duration;

use crate::domain::user::User;
use crate::infra::db::Db;

const TOKEN_ISSUER: &str = "ripple";

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: i64,
}

/// Claims carried by an access token: the subject identity and the email it
/// was issued for.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i64,
    pub email: String,
}

/// A freshly authenticated identity: the bearer token plus the public user
/// record it was issued for.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    db: Db,
    paseto_key: [u8; 32],
    token_ttl_hours: u64,
}

impl AuthService {
    pub fn new(db: Db, paseto_key: [u8; 32], token_ttl_hours: u64) -> Self {
        Self {
            db,
            paseto_key,
            token_ttl_hours,
        }
    }

    /// Hash the password, persist the user and issue a token. Email
    /// uniqueness is enforced by the users.email constraint; a duplicate
    /// surfaces as a database error for the caller to map.
    pub async fn register(&self, name: String, email: String, password: String) -> Result<AuthenticatedUser> {
        let password_hash = hash_password(&password)?;

        let row = sqlx::query(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, email, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.db.pool())
        .await?;

        let user = User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        };

        let token = issue_token(&self.paseto_key, self.token_ttl(), user.id, &user.email)?;
        Ok(AuthenticatedUser { token, user })
    }

    /// Returns `None` both when the email is unknown and when the password
    /// does not verify, so the caller cannot distinguish the two.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<AuthenticatedUser>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let password_hash: String = row.get("password_hash");
        if !verify_password(password, &password_hash)? {
            return Ok(None);
        }

        let user = User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        };

        let token = issue_token(&self.paseto_key, self.token_ttl(), user.id, &user.email)?;
        Ok(Some(AuthenticatedUser { token, user }))
    }

    pub async fn get_current_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let user = row.map(|row| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        });

        Ok(user)
    }

    pub fn authenticate_access_token(&self, token: &str) -> Result<Option<AuthSession>> {
        let claims = match verify_token(&self.paseto_key, token)? {
            Some(claims) => claims,
            None => return Ok(None),
        };
        Ok(Some(AuthSession {
            user_id: claims.user_id,
        }))
    }

    fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_hours * 60 * 60)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {}", err))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| anyhow!("failed to parse password hash: {}", err))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issue a time-limited token for the given subject. Issued-at and expiry
/// claims are stamped by the claim builder.
pub fn issue_token(key_bytes: &[u8; 32], ttl: Duration, user_id: i64, email: &str) -> Result<String> {
    let key = SymmetricKey::<V4>::from(key_bytes)?;
    let mut claims = Claims::new_expires_in(&ttl)?;
    claims.issuer(TOKEN_ISSUER)?;
    claims.audience(TOKEN_ISSUER)?;
    claims.subject(&user_id.to_string())?;
    claims.add_additional("email", email)?;
    Ok(local::encrypt(&key, &claims, None, None)?)
}

/// Verify a token's integrity and expiry. Returns `None` for anything that
/// does not decrypt to valid, unexpired claims from this issuer.
pub fn verify_token(key_bytes: &[u8; 32], token: &str) -> Result<Option<TokenClaims>> {
    let key = SymmetricKey::<V4>::from(key_bytes)?;
    let mut rules = ClaimsValidationRules::new();
    rules.validate_issuer_with(TOKEN_ISSUER);
    rules.validate_audience_with(TOKEN_ISSUER);

    let untrusted = match UntrustedToken::<Local, V4>::try_from(token) {
        Ok(token) => token,
        Err(_) => return Ok(None),
    };
    let trusted = match local::decrypt(&key, &untrusted, &rules, None, None) {
        Ok(token) => token,
        Err(_) => return Ok(None),
    };
    let claims = match trusted.payload_claims() {
        Some(claims) => claims,
        None => return Ok(None),
    };

    let subject = match claims.get_claim("sub").and_then(|value| value.as_str()) {
        Some(subject) => subject,
        None => return Ok(None),
    };
    let user_id = match subject.parse::<i64>() {
        Ok(user_id) => user_id,
        Err(_) => return Ok(None),
    };
    let email = claims
        .get_claim("email")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(TokenClaims { user_id, email }))
}
