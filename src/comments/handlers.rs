use axum::{
    extract::{Path, Query, State},
    routing::put,
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    CommentAuthor, CommentRequest, CommentView, CreatedCommentResponse, MessageResponse,
};
use super::services;
use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    params::parse_id,
    recipes::dto::OwnerQuery,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes/:id/comments",
            axum::routing::get(list_comments).post(add_comment),
        )
        .route(
            "/recipes/comments/:comment_id",
            put(update_comment).delete(delete_comment),
        )
}

#[instrument(skip(state, body))]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> AppResult<Json<CreatedCommentResponse>> {
    let recipe_id = parse_id(&id).ok_or_else(|| AppError::not_found("Recipe not found"))?;
    let id = services::add(&state.db, recipe_id, body.user_id, body.content.as_deref()).await?;
    Ok(Json(CreatedCommentResponse {
        message: "Comment added",
        id,
    }))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentView>>> {
    match parse_id(&id) {
        Some(recipe_id) => services::list(&state.db, recipe_id).await.map(Json),
        None => Ok(Json(Vec::new())),
    }
}

#[instrument(skip(state, body))]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&comment_id).ok_or_else(|| AppError::not_found("Comment not found"))?;
    services::edit(&state.db, id, body.user_id, body.content.as_deref()).await?;
    Ok(Json(MessageResponse {
        message: "Comment updated",
    }))
}

/// DELETE /recipes/comments/:comment_id with `{userId}` in the body
/// (or `?user_id=` when the client cannot send a body).
#[instrument(skip(state, body))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Query(owner): Query<OwnerQuery>,
    body: Option<JsonBody<CommentAuthor>>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&comment_id).ok_or_else(|| AppError::not_found("Comment not found"))?;
    let user_id = body
        .and_then(|JsonBody(b)| b.user_id)
        .or_else(|| owner.user_id.as_deref().and_then(parse_id));
    services::remove(&state.db, id, user_id).await?;
    Ok(Json(MessageResponse {
        message: "Comment deleted",
    }))
}
