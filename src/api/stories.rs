//! Story endpoints.
//!
//! - GET    /stories            list stories
//! - POST   /stories            create story
//! - GET    /stories/prompts    static prompt list
//! - GET    /stories/{id}       story detail
//! - PUT    /stories/{id}       replace story fields, keep id
//! - DELETE /stories/{id}       delete story

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::{body, ApiError, AppState};
use crate::lane::stories;
use crate::lane::types::StoryInput;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stories", get(list).post(create))
        .route("/stories/prompts", get(prompts))
        .route("/stories/{id}", get(detail).put(update).delete(remove))
}

/// GET /stories
async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stories = state.with_db(|conn, _| stories::list_stories(conn)).await?;
    Ok(Json(json!({"success": true, "stories": stories})))
}

/// POST /stories
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<StoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let story = state
        .with_db(move |conn, _| stories::create_story(conn, &input))
        .await?;
    tracing::info!(id = %story.id, story_type = %story.story_type, "story created");
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "story": story})),
    ))
}

/// GET /stories/prompts
async fn prompts() -> impl IntoResponse {
    Json(json!({"success": true, "prompts": stories::STORY_PROMPTS}))
}

/// GET /stories/{id}
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let story = state
        .with_db(move |conn, _| stories::get_story(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "story": story})))
}

/// PUT /stories/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let story = state
        .with_db(move |conn, _| stories::update_story(conn, &id, &input))
        .await?;
    Ok(Json(json!({"success": true, "story": story})))
}

/// DELETE /stories/{id}
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = id.clone();
    state
        .with_db(move |conn, _| stories::delete_story(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "deleted": deleted})))
}
