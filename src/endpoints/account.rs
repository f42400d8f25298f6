use anyhow::{Context as _, anyhow};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState, Db, Error, Result, auth,
    auth::AuthenticatedUser,
    config::AppConfig,
    forms::{LoginInput, RegisterInput},
    metrics::{AUTH_FAILED, USERS_REGISTERED},
    models::{self, Role, User, UserView},
};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginOutput {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserView,
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<UserView>)> {
    let input = input.validated()?;
    let hash = auth::hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, anonymous_name, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (username) DO NOTHING
        RETURNING id, username, anonymous_name, password_hash, role, created_at
        "#,
    )
    .bind(&input.username)
    .bind(&input.anonymous_name)
    .bind(hash)
    .bind(Role::Member)
    .bind(Utc::now())
    .fetch_optional(&db)
    .await
    .context("failed to create account")?
    .ok_or_else(|| {
        Error::conflict(anyhow!(
            "username already exists, choose a different one"
        ))
    })?;

    metrics::counter!(USERS_REGISTERED).increment(1);
    info!(user_id = user.id, "new account registered");

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

async fn login(
    State(db): State<Db>,
    State(config): State<AppConfig>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>> {
    let input = input.validated()?;

    let user = models::find_user_by_name(&db, &input.username).await?;
    // Unknown names still pay for a hash verification.
    let hash = user
        .as_ref()
        .map_or(auth::DUMMY_PASSWORD_HASH, |user| user.password_hash.as_str());
    let verified = auth::verify_password(&input.password, hash)? && user.is_some();
    let user = match user {
        Some(user) if verified => user,
        _ => {
            metrics::counter!(AUTH_FAILED).increment(1);
            return Err(Error::unauthorized(anyhow!("invalid username or password")));
        }
    };

    let token = auth::create_session(&db, user.id, config.session.ttl_hours).await?;
    info!(user_id = user.id, "session created");

    Ok(Json(LoginOutput {
        token,
        user: UserView::from(&user),
    }))
}

async fn logout(auth: AuthenticatedUser, State(db): State<Db>) -> Result<StatusCode> {
    auth::delete_session(&db, &auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(auth: AuthenticatedUser) -> Json<UserView> {
    Json(UserView::from(&auth.user))
}

#[rustfmt::skip]
pub(super) fn routes() -> Router<AppState> {
    // UP /api/register
    // UP /api/login
    // AP /api/logout
    // AG /api/me
    Router::new()
        .route("/register", post(register))
        .route("/login",    post(login))
        .route("/logout",   post(logout))
        .route("/me",       get(me))
}
