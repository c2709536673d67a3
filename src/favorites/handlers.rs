use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::repo;
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    params::{de_opt_id, parse_id},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    #[serde(rename = "userId", default, deserialize_with = "de_opt_id")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FavoriteCount {
    pub count: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/:id/favorite", post(favorite))
        .route("/recipes/:id/favorites", get(favorites_count))
}

#[instrument(skip(state, body))]
pub async fn favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> AppResult<Json<FavoriteResponse>> {
    let recipe_id = parse_id(&id).ok_or_else(|| AppError::not_found("Recipe not found"))?;
    let user_id = body
        .user_id
        .ok_or_else(|| AppError::bad_request("userId required"))?;

    let inserted = repo::add(&state.db, user_id, recipe_id).await?;
    info!(recipe_id, user_id, inserted, "recipe favorited");
    Ok(Json(FavoriteResponse {
        message: "Recipe favorited",
    }))
}

#[instrument(skip(state))]
pub async fn favorites_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FavoriteCount>> {
    let count = match parse_id(&id) {
        Some(recipe_id) => repo::count_for_recipe(&state.db, recipe_id).await?,
        None => 0,
    };
    Ok(Json(FavoriteCount { count }))
}
