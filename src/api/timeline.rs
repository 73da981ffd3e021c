//! Timeline endpoints.
//!
//! - GET    /timeline         paginated chronological list (`?page=`, `?category=`)
//! - POST   /timeline         create event
//! - GET    /timeline/{id}    event detail
//! - DELETE /timeline/{id}    delete event

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{body, query, ApiError, AppState};
use crate::lane::timeline;
use crate::lane::types::TimelineInput;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/timeline", get(list).post(create))
        .route("/timeline/{id}", get(detail).delete(remove))
}

#[derive(Debug, Deserialize)]
struct TimelineQuery {
    page: Option<usize>,
    category: Option<String>,
}

/// GET /timeline
async fn list(
    State(state): State<AppState>,
    params: Result<Query<TimelineQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query(params)?;
    let per_page = state.config().api.timeline_page_size;
    let page = state
        .with_db(move |conn, _| {
            timeline::list_timeline(
                conn,
                params.page.unwrap_or(1),
                per_page,
                params.category.as_deref(),
            )
        })
        .await?;
    Ok(Json(json!({
        "success": true,
        "events": page.events,
        "page": page.page,
        "per_page": page.per_page,
        "total": page.total,
        "has_more": page.has_more,
    })))
}

/// POST /timeline
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TimelineInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let event = state
        .with_db(move |conn, _| timeline::create_event(conn, &input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "event": event})),
    ))
}

/// GET /timeline/{id}
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .with_db(move |conn, _| timeline::get_event(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "event": event})))
}

/// DELETE /timeline/{id}
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = id.clone();
    state
        .with_db(move |conn, _| timeline::delete_event(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "deleted": deleted})))
}
