//! Database rows and their API views.

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{Db, moderation::EmotionCategory};

/// What a user is allowed to do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub anonymous_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A user as shown to themselves. Other users only ever see `anonymous_name`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub anonymous_name: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            anonymous_name: user.anonymous_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct PostView {
    pub id: i64,
    /// The author's anonymous name.
    pub author: String,
    pub content: String,
    pub sentiment_score: f64,
    pub emotion_category: EmotionCategory,
    /// Visible (unflagged) replies.
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct ReplyView {
    pub id: i64,
    pub post_id: i64,
    /// The author's anonymous name.
    pub author: String,
    pub reply_text: String,
    pub sentiment_score: f64,
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
}

const SELECT_POSTS: &str = r#"
    SELECT p.id, u.anonymous_name AS author, p.content, p.sentiment_score,
        p.emotion_category, p.created_at,
        (SELECT COUNT(*) FROM replies r WHERE r.post_id = p.id AND r.flagged = 0) AS reply_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

const SELECT_REPLIES: &str = r#"
    SELECT r.id, r.post_id, u.anonymous_name AS author, r.reply_text, r.sentiment_score,
        r.flagged, r.created_at
    FROM replies r
    JOIN users u ON u.id = r.user_id
"#;

pub async fn find_user_by_name(db: &Db, username: &str) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, anonymous_name, password_hash, role, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
    .context("failed to look up user")
}

/// All posts, newest first.
pub async fn list_posts(db: &Db) -> anyhow::Result<Vec<PostView>> {
    sqlx::query_as::<_, PostView>(&format!(
        "{SELECT_POSTS} ORDER BY p.created_at DESC, p.id DESC"
    ))
    .fetch_all(db)
    .await
    .context("failed to list posts")
}

pub async fn find_post(db: &Db, id: i64) -> anyhow::Result<Option<PostView>> {
    sqlx::query_as::<_, PostView>(&format!("{SELECT_POSTS} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("failed to fetch post")
}

/// Unflagged replies to a post, oldest first.
pub async fn visible_replies(db: &Db, post_id: i64) -> anyhow::Result<Vec<ReplyView>> {
    sqlx::query_as::<_, ReplyView>(&format!(
        "{SELECT_REPLIES} WHERE r.post_id = ? AND r.flagged = 0 ORDER BY r.created_at ASC, r.id ASC"
    ))
    .bind(post_id)
    .fetch_all(db)
    .await
    .context("failed to list replies")
}

/// Replies awaiting review, newest first.
pub async fn flagged_replies(db: &Db) -> anyhow::Result<Vec<ReplyView>> {
    sqlx::query_as::<_, ReplyView>(&format!(
        "{SELECT_REPLIES} WHERE r.flagged = 1 ORDER BY r.created_at DESC, r.id DESC"
    ))
    .fetch_all(db)
    .await
    .context("failed to list flagged replies")
}

pub async fn find_reply(db: &Db, id: i64) -> anyhow::Result<Option<ReplyView>> {
    sqlx::query_as::<_, ReplyView>(&format!("{SELECT_REPLIES} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("failed to fetch reply")
}
