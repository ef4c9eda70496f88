use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::demo::store::{Tutorial, TutorialInput};
use crate::demo::DemoState;

pub async fn get_movies(State(state): State<DemoState>) -> impl IntoResponse {
    tokio::time::sleep(state.movies_delay).await;
    Json(json!({
        "movies": [
            { "name": "Jaws", "genre": "Thriller" },
            { "name": "Annie", "genre": "Family" },
            { "name": "Jurassic Park", "genre": "Action" },
        ]
    }))
}

pub async fn get_error() -> impl IntoResponse {
    tracing::error!("Synthetic failure requested");
    (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
}

pub async fn get_500() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Occurred")
}

pub async fn get_504() -> impl IntoResponse {
    (StatusCode::GATEWAY_TIMEOUT, "Timeout error")
}

pub async fn list_tutorials(State(state): State<DemoState>) -> Json<Vec<Tutorial>> {
    Json(state.store.list())
}

pub async fn create_tutorial(
    State(state): State<DemoState>,
    Json(input): Json<TutorialInput>,
) -> Json<Tutorial> {
    let tutorial = state.store.create(input);
    tracing::debug!(id = tutorial.id, "Tutorial created");
    Json(tutorial)
}

pub async fn get_tutorial(
    State(state): State<DemoState>,
    Path(id): Path<u64>,
) -> Result<Json<Tutorial>, StatusCode> {
    state.store.get(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_tutorial(
    State(state): State<DemoState>,
    Path(id): Path<u64>,
    Json(input): Json<TutorialInput>,
) -> Result<Json<Tutorial>, StatusCode> {
    state.store.update(id, input).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn delete_tutorial(
    State(state): State<DemoState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.store.delete(id) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "Tutorial was deleted successfully!" }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Cannot delete Tutorial with id={}", id) })),
        ),
    }
}
