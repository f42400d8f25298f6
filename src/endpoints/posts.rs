use anyhow::{Context as _, anyhow};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    AppState, Db, Error, Result,
    auth::AuthenticatedUser,
    forms::{PostInput, ReplyInput},
    metrics::{POSTS_CREATED, REPLIES_CREATED, REPLIES_FLAGGED},
    models::{self, PostView, ReplyView},
    moderation::ModerationPipeline,
    resources::calming_resources,
};

#[derive(Serialize, Debug)]
pub struct PostDetail {
    pub post: PostView,
    /// Visible replies, oldest first.
    pub replies: Vec<ReplyView>,
    pub resources: &'static [&'static str],
}

#[derive(Serialize, Debug)]
pub struct ReplyCreated {
    pub reply: ReplyView,
    pub message: &'static str,
}

async fn list_posts(State(db): State<Db>) -> Result<Json<Vec<PostView>>> {
    Ok(Json(models::list_posts(&db).await?))
}

async fn create_post(
    auth: AuthenticatedUser,
    State(db): State<Db>,
    State(pipeline): State<ModerationPipeline>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<PostView>)> {
    let input = input.validated()?;

    // Annotate before touching the database so a scorer failure stores nothing.
    let annotation = pipeline.annotate_post(&input.content)?;
    let created_at = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO posts (user_id, content, sentiment_score, emotion_category, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
        "#,
    )
    .bind(auth.user.id)
    .bind(&input.content)
    .bind(annotation.sentiment_score)
    .bind(annotation.emotion_category)
    .bind(created_at)
    .fetch_one(&db)
    .await
    .context("failed to create post")?;

    metrics::counter!(POSTS_CREATED, "emotion" => annotation.emotion_category.as_str())
        .increment(1);
    info!(
        post_id = id,
        emotion = %annotation.emotion_category,
        score = annotation.sentiment_score,
        "post created"
    );

    Ok((
        StatusCode::CREATED,
        Json(PostView {
            id,
            author: auth.user.anonymous_name,
            content: input.content,
            sentiment_score: annotation.sentiment_score,
            emotion_category: annotation.emotion_category,
            reply_count: 0,
            created_at,
        }),
    ))
}

async fn view_post(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<PostDetail>> {
    let post = models::find_post(&db, id)
        .await?
        .ok_or_else(|| Error::not_found(anyhow!("post {id} not found")))?;
    let replies = models::visible_replies(&db, id).await?;
    let resources = calming_resources(post.emotion_category);

    Ok(Json(PostDetail {
        post,
        replies,
        resources,
    }))
}

async fn create_reply(
    auth: AuthenticatedUser,
    State(db): State<Db>,
    State(pipeline): State<ModerationPipeline>,
    Path(post_id): Path<i64>,
    Json(input): Json<ReplyInput>,
) -> Result<(StatusCode, Json<ReplyCreated>)> {
    let input = input.validated()?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&db)
        .await
        .context("failed to look up post")?;
    if exists.is_none() {
        return Err(Error::not_found(anyhow!("post {post_id} not found")));
    }

    let annotation = pipeline.annotate_reply(&input.reply_text)?;
    let created_at = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO replies (post_id, user_id, reply_text, sentiment_score, flagged, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(auth.user.id)
    .bind(&input.reply_text)
    .bind(annotation.sentiment_score)
    .bind(annotation.flagged)
    .bind(created_at)
    .fetch_one(&db)
    .await
    .context("failed to create reply")?;

    metrics::counter!(REPLIES_CREATED).increment(1);
    let message = if annotation.flagged {
        metrics::counter!(REPLIES_FLAGGED).increment(1);
        warn!(
            reply_id = id,
            post_id,
            score = annotation.sentiment_score,
            "reply held for review"
        );
        "Your reply contains inappropriate content and has been flagged for review."
    } else {
        info!(reply_id = id, post_id, "reply created");
        "Your reply has been posted!"
    };

    Ok((
        StatusCode::CREATED,
        Json(ReplyCreated {
            reply: ReplyView {
                id,
                post_id,
                author: auth.user.anonymous_name,
                reply_text: input.reply_text,
                sentiment_score: annotation.sentiment_score,
                flagged: annotation.flagged,
                created_at,
            },
            message,
        }),
    ))
}

#[rustfmt::skip]
pub(super) fn routes() -> Router<AppState> {
    // UG /api/posts
    // AP /api/posts
    // UG /api/posts/{id}
    // AP /api/posts/{id}/replies
    Router::new()
        .route("/posts",              get(list_posts).post(create_post))
        .route("/posts/{id}",         get(view_post))
        .route("/posts/{id}/replies", post(create_reply))
}
