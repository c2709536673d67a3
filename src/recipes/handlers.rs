use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{
    CreatedRecipeResponse, ListQuery, MessageResponse, OwnerQuery, RecipeForm, RecipeListing,
};
use super::repo_types::{Recipe, RecipeSummary};
use super::services::{self, UpdateOutcome};
use crate::{
    error::{AppError, AppResult},
    images::{
        services::{discard_image, store_image},
        MultipartForm,
    },
    ownership::{ensure_owner, Owned},
    params::parse_id,
    state::AppState,
};

// --- routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_public))
        .route("/recipes/mine", get(list_mine))
        .route("/recipes/user/:user_id", get(list_for_user))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", axum::routing::post(create_recipe))
        .route(
            "/recipes/:id",
            axum::routing::put(update_recipe).delete(delete_recipe),
        )
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_public(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    services::list_public(&state.db, &q).await.map(Json)
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<RecipeListing>> {
    let user_id = q
        .user_id
        .as_deref()
        .and_then(parse_id)
        .ok_or_else(|| AppError::bad_request("user_id required"))?;
    services::list_mine(&state.db, user_id, &q).await.map(Json)
}

/// GET /recipes/user/:user_id — same as `/mine` with the id in the path.
#[instrument(skip(state))]
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<RecipeListing>> {
    let user_id = parse_id(&user_id).ok_or_else(|| AppError::bad_request("user_id required"))?;
    services::list_mine(&state.db, user_id, &q).await.map(Json)
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let id = parse_id(&id).ok_or_else(|| AppError::not_found("Recipe not found"))?;
    services::get(&state.db, id).await.map(Json)
}

/// POST /recipes (multipart)
/// Fields: user_id, title, ingredients, instructions, description?, category?,
/// visibility?; file field: image?
#[instrument(skip(state, mp))]
pub async fn create_recipe(
    State(state): State<AppState>,
    mp: Multipart,
) -> AppResult<(StatusCode, HeaderMap, Json<CreatedRecipeResponse>)> {
    let mut form = MultipartForm::read(mp).await?;
    let fields = RecipeForm::from_form(&form);
    if let Err(e) = fields.validate_new() {
        warn!(?fields, "create recipe missing fields");
        return Err(e);
    }

    let image = match form.take_file("image") {
        Some(file) => Some(
            store_image(state.storage.as_ref(), state.config.uploads.max_bytes, file).await?,
        ),
        None => None,
    };

    let new = fields.into_new(image.clone())?;
    let recipe_id = match services::create(&state.db, new).await {
        Ok(id) => id,
        Err(e) => {
            discard_image(state.storage.as_ref(), image.as_deref()).await;
            return Err(e);
        }
    };

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/recipes/{}", recipe_id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedRecipeResponse {
            message: "Recipe added",
            recipe_id,
        }),
    ))
}

/// PUT /recipes/:id (multipart). `user_id` comes from the body or the query.
#[instrument(skip(state, mp))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(owner): Query<OwnerQuery>,
    mp: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let mut form = MultipartForm::read(mp).await?;
    let fields = RecipeForm::from_form(&form);
    let user_id = fields
        .user_id
        .or_else(|| owner.user_id.as_deref().and_then(parse_id))
        .ok_or_else(|| AppError::bad_request("user_id required"))?;
    let id = parse_id(&id).ok_or_else(|| AppError::not_found("Recipe not found"))?;

    // check ownership before writing any file
    ensure_owner(&state.db, Owned::Recipe, id, user_id).await?;

    let image = match form.take_file("image") {
        Some(file) => Some(
            store_image(state.storage.as_ref(), state.config.uploads.max_bytes, file).await?,
        ),
        None => None,
    };

    match services::update(&state.db, id, user_id, fields.into_changes(image.clone())).await {
        Ok(UpdateOutcome::Unchanged) => Ok(Json(MessageResponse {
            message: "Nothing to update",
        })),
        Ok(UpdateOutcome::Updated { previous_image }) => {
            if image.is_some() {
                discard_image(state.storage.as_ref(), previous_image.as_deref()).await;
            }
            Ok(Json(MessageResponse {
                message: "Recipe updated",
            }))
        }
        Err(e) => {
            discard_image(state.storage.as_ref(), image.as_deref()).await;
            Err(e)
        }
    }
}

/// DELETE /recipes/:id?user_id=
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<MessageResponse>> {
    let (Some(id), Some(user_id)) = (
        parse_id(&id),
        owner.user_id.as_deref().and_then(parse_id),
    ) else {
        return Err(AppError::bad_request("id and user_id required"));
    };

    let image = services::delete(&state.db, id, user_id).await?;
    discard_image(state.storage.as_ref(), image.as_deref()).await;
    Ok(Json(MessageResponse {
        message: "Recipe deleted",
    }))
}
