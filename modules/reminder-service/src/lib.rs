//! Reminder Service: a small JSON API over a flat-file reminder list.
//!
//! Routes:
//! - `GET  /reminder/list`          all reminders, ordered
//! - `GET  /reminder/id/:id`        one reminder by id
//! - `POST /reminder/searchByDate`  reminders due in a `YYYY-MM` month, ordered
//! - `POST /reminder/update`        set a reminder's checked flag

pub mod config;
pub mod ordering;
pub mod routes;
pub mod store;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use routes::AppState;
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> axum::Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    axum::Router::new()
        .route("/reminder/list", axum::routing::get(routes::list_reminders))
        .route("/reminder/id/:id", axum::routing::get(routes::get_reminder))
        .route(
            "/reminder/searchByDate",
            axum::routing::post(routes::search_by_date),
        )
        .route(
            "/reminder/update",
            axum::routing::post(routes::update_reminder),
        )
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

async fn log_request(req: Request, next: Next) -> Response {
    log::info!("Request: {} {}", req.method(), req.uri());
    next.run(req).await
}
