use anyhow::{Context as _, anyhow};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::info;

use crate::{
    AppState, Db, Error, Result,
    auth::AdminUser,
    metrics::{MODERATION_APPROVED, MODERATION_DELETED},
    models::{self, ReplyView},
};

async fn flagged_replies(_admin: AdminUser, State(db): State<Db>) -> Result<Json<Vec<ReplyView>>> {
    Ok(Json(models::flagged_replies(&db).await?))
}

/// Clear a reply's flag so it shows up under its post. Approving twice is harmless.
async fn approve_reply(
    AdminUser(admin): AdminUser,
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ReplyView>> {
    let updated = sqlx::query("UPDATE replies SET flagged = 0 WHERE id = ?")
        .bind(id)
        .execute(&db)
        .await
        .context("failed to approve reply")?
        .rows_affected();
    if updated == 0 {
        return Err(Error::not_found(anyhow!("reply {id} not found")));
    }

    metrics::counter!(MODERATION_APPROVED).increment(1);
    info!(reply_id = id, admin = %admin.username, "reply approved");

    let reply = models::find_reply(&db, id)
        .await?
        .ok_or_else(|| Error::not_found(anyhow!("reply {id} not found")))?;
    Ok(Json(reply))
}

async fn delete_reply(
    AdminUser(admin): AdminUser,
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = sqlx::query("DELETE FROM replies WHERE id = ?")
        .bind(id)
        .execute(&db)
        .await
        .context("failed to delete reply")?
        .rows_affected();
    if deleted == 0 {
        return Err(Error::not_found(anyhow!("reply {id} not found")));
    }

    metrics::counter!(MODERATION_DELETED).increment(1);
    info!(reply_id = id, admin = %admin.username, "reply deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[rustfmt::skip]
pub(super) fn routes() -> Router<AppState> {
    // AG /api/admin/flagged
    // AP /api/admin/replies/{id}/approve
    // AD /api/admin/replies/{id}
    Router::new()
        .route("/flagged",              get(flagged_replies))
        .route("/replies/{id}/approve", post(approve_reply))
        .route("/replies/{id}",         delete(delete_reply))
}
