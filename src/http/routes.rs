use axum::{routing::delete, routing::get, routing::post, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::create_post))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/:id", get(handlers::get_post))
        .route("/posts/:id", put(handlers::update_post))
        .route("/posts/:id", delete(handlers::delete_post))
        .route("/posts/:id/preview", get(handlers::preview_post))
        .route("/preview", post(handlers::preview_adhoc))
}

pub fn calendar() -> Router<AppState> {
    Router::new().route("/calendar/:year/:month", get(handlers::calendar_month))
}

pub fn reports() -> Router<AppState> {
    Router::new()
        .route("/reports", get(handlers::get_report))
        .route("/reports/export", get(handlers::export_report))
}

pub fn accounts() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(handlers::list_accounts))
        .route("/brands", get(handlers::list_brands))
}
