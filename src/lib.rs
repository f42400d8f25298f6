//! Anonymous peer-support forum.
mod auth;
mod config;
mod db;
mod endpoints;
pub mod error;
mod forms;
mod metrics;
mod models;
pub mod moderation;
mod resources;
mod serve;

pub use error::Error;
pub use serve::run;
pub(crate) use serve::{AppState, Db, Result};

/// The index (/) route.
async fn index() -> impl axum::response::IntoResponse {
    r"
  _____ _                            _   _       _
 |_   _| |__   ___ _ __ __ _ _ __  _   _| | | |_   _| |__
   | | | '_ \ / _ \ '__/ _` | '_ \| | | | |_| | | | | '_ \
   | | | | | |  __/ | | (_| | |_) | |_| |  _  | |_| | |_) |
   |_| |_| |_|\___|_|  \__,_| .__/ \__, |_| |_|\__,_|_.__/
                            |_|    |___/

This is TherapyHub, an anonymous peer support forum.

All API routes are under /api/

    Posts: GET /api/posts
  Account: POST /api/register, POST /api/login
    "
}
