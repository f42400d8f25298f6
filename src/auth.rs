//! Authentication layers

use anyhow::{Context as _, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    AppState, Db, Error, Result,
    config::AppConfig,
    forms::RegisterInput,
    metrics::AUTH_FAILED,
    models::{Role, User},
};

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?
        .to_string())
}

/// Verified in place of a real hash when the username is unknown, so that a failed login
/// costs the same whether or not the account exists. Uses the default Argon2id parameters.
pub const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$Cj9g6AvkBoACA1EbT68DMz9XN7kDDskIxQMRLlJf0p8";

/// Check `password` against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let hash = PasswordHash::new(hash).map_err(|e| anyhow!("invalid password hash in db: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok())
}

/// Open a new session for `user_id` and return its bearer token.
pub async fn create_session(db: &Db, user_id: i64, ttl_hours: u32) -> anyhow::Result<String> {
    // N.B: Sessions are opaque random identifiers looked up on every request rather than
    // self-contained tokens, so logging out revokes them immediately.
    let token = Uuid::new_v4().to_string();
    let now = Utc::now();
    let expires_at = now + Duration::hours(i64::from(ttl_hours));

    _ = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(db)
        .await
        .context("failed to prune expired sessions")?;

    _ = sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .execute(db)
    .await
    .context("failed to create session")?;

    Ok(token)
}

pub async fn delete_session(db: &Db, token: &str) -> anyhow::Result<()> {
    _ = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(token)
        .execute(db)
        .await
        .context("failed to delete session")?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct SessionUser {
    expires_at: DateTime<Utc>,
    #[sqlx(flatten)]
    user: User,
}

/// A request made with a valid session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|auth| auth.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::unauthorized(anyhow!("login required")))?
            .to_owned();

        let found = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT s.expires_at, u.id, u.username, u.anonymous_name, u.password_hash, u.role,
                u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
        )
        .bind(&token)
        .fetch_optional(&state.db)
        .await
        .context("failed to look up session")?;

        match found {
            Some(found) if found.expires_at > Utc::now() => Ok(Self {
                user: found.user,
                token,
            }),
            Some(_) => {
                delete_session(&state.db, &token).await?;
                metrics::counter!(AUTH_FAILED).increment(1);
                Err(Error::unauthorized(anyhow!("session expired")))
            }
            None => {
                metrics::counter!(AUTH_FAILED).increment(1);
                Err(Error::unauthorized(anyhow!("invalid session")))
            }
        }
    }
}

/// An authenticated user holding the [`Role::Admin`] role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let AuthenticatedUser { user, .. } =
            AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.is_admin() {
            Ok(Self(user))
        } else {
            Err(Error::forbidden(anyhow!("admin privileges required")))
        }
    }
}

/// Make sure an administrator exists.
///
/// Returns the generated password when the account was created without a configured one.
/// Fails if the configured credentials could never pass login validation.
pub async fn ensure_admin(db: &Db, config: &AppConfig) -> anyhow::Result<Option<String>> {
    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(Role::Admin)
        .fetch_one(db)
        .await
        .context("failed to count administrators")?;
    if admins > 0 {
        return Ok(None);
    }

    let generated = config.admin.password.is_none().then(|| {
        use rand::{Rng as _, distributions::Alphanumeric};

        rand::thread_rng()
            .sample_iter(Alphanumeric)
            .take(16)
            .map(char::from)
            .collect::<String>()
    });
    let password = config
        .admin
        .password
        .clone()
        .or_else(|| generated.clone())
        .context("no administrator password")?;

    // Same bounds as registration and login.
    let admin = RegisterInput {
        username: config.admin.username.clone(),
        anonymous_name: config.admin.display_name.clone(),
        password,
    }
    .validated()
    .map_err(|e| anyhow!("invalid [admin] configuration: {}", e.message()))?;
    let hash = hash_password(&admin.password)?;

    // An existing member with the configured name is promoted instead of duplicated.
    _ = sqlx::query(
        r#"
        INSERT INTO users (username, anonymous_name, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (username) DO UPDATE
            SET role = excluded.role, password_hash = excluded.password_hash
        "#,
    )
    .bind(&admin.username)
    .bind(&admin.anonymous_name)
    .bind(hash)
    .bind(Role::Admin)
    .bind(Utc::now())
    .execute(db)
    .await
    .context("failed to create administrator")?;

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn dummy_hash_is_verifiable() {
        assert!(!verify_password("any password", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-hash").is_err());
    }
}
