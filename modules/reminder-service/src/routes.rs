//! Axum route handlers for the reminder API.
//!
//! Every handler reloads the list from the store first. Failed loads are not
//! reported; the handler works on the last list that did load.

use crate::ordering;
use crate::store::{self, Store};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, FixedOffset, Local};
use reminder_types::*;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<Store>,
    /// Source of "now" for bucketing.
    pub clock: fn() -> DateTime<FixedOffset>,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            clock: local_now,
        }
    }
}

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

fn bad_body<T: serde::Serialize>(rejection: JsonRejection) -> (StatusCode, Json<ApiResponse<T>>) {
    log::warn!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::err("Invalid request body")),
    )
}

// GET /reminder/list
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<Vec<Reminder>>>) {
    let reminders = state.store.load_or_cached();
    let ordered = ordering::classify_and_order(reminders, (state.clock)());
    (StatusCode::OK, Json(ApiResponse::ok(ordered)))
}

// GET /reminder/id/:id
pub async fn get_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse<Reminder>>) {
    let reminders = state.store.load_or_cached();
    log::info!("Received ID: {}", id);

    match store::find_by_id(&reminders, &id) {
        Some(reminder) => {
            log::info!("Found reminder #{}: {}", reminder.id, reminder.title);
            (StatusCode::OK, Json(ApiResponse::ok(reminder.clone())))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Reminder not found")),
        ),
    }
}

// POST /reminder/searchByDate
pub async fn search_by_date(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchByDateRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<Vec<Reminder>>>) {
    let reminders = state.store.load_or_cached();
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_body(rejection),
    };

    let matched = match ordering::filter_by_month(reminders, &req.date) {
        Ok(matched) => matched,
        Err(e) => {
            log::error!("Search for {} aborted: {}", req.date, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err("Error parsing reminder due date")),
            );
        }
    };

    let ordered = ordering::classify_and_order(matched, (state.clock)());
    (StatusCode::OK, Json(ApiResponse::ok(ordered)))
}

// POST /reminder/update
pub async fn update_reminder(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpdateCheckedRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let mut reminders = state.store.load_or_cached();
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_body(rejection),
    };
    log::info!("Update request: id={} is_checked={}", req.id, req.is_checked);

    if !store::set_checked(&mut reminders, req.id, req.is_checked) {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Reminder not found")),
        );
    }

    if let Err(e) = state.store.save(reminders) {
        log::error!("Failed to save reminders to {}: {}", state.store.path().display(), e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err("Error saving reminders to file")),
        );
    }

    (StatusCode::OK, Json(ApiResponse::done()))
}
