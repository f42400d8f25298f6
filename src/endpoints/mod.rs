use axum::Router;

use crate::AppState;

mod account;
mod admin;
mod posts;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(account::routes())
        .merge(posts::routes())
        .nest("/admin", admin::routes())
}
