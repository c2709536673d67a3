use sqlx::SqlitePool;
use tracing::info;

use super::dto::CommentView;
use super::repo;
use crate::error::{AppError, AppResult};
use crate::ownership::{ensure_owner, Owned};

fn required_content(content: Option<&str>) -> Option<&str> {
    content.map(str::trim).filter(|c| !c.is_empty())
}

pub async fn add(
    db: &SqlitePool,
    recipe_id: i64,
    user_id: Option<i64>,
    content: Option<&str>,
) -> AppResult<i64> {
    let (Some(content), Some(user_id)) = (required_content(content), user_id) else {
        return Err(AppError::bad_request("Missing content or user"));
    };
    let id = repo::insert(db, recipe_id, user_id, content).await?;
    info!(comment_id = id, recipe_id, user_id, "comment added");
    Ok(id)
}

pub async fn list(db: &SqlitePool, recipe_id: i64) -> AppResult<Vec<CommentView>> {
    Ok(repo::list_for_recipe(db, recipe_id).await?)
}

/// Author-only edit.
pub async fn edit(
    db: &SqlitePool,
    id: i64,
    user_id: Option<i64>,
    content: Option<&str>,
) -> AppResult<()> {
    let (Some(content), Some(user_id)) = (required_content(content), user_id) else {
        return Err(AppError::bad_request("content and userId required"));
    };
    ensure_owner(db, Owned::Comment, id, user_id).await?;
    repo::update_content(db, id, content).await?;
    info!(comment_id = id, user_id, "comment updated");
    Ok(())
}

/// Author-only delete.
pub async fn remove(db: &SqlitePool, id: i64, user_id: Option<i64>) -> AppResult<()> {
    let user_id = user_id.ok_or_else(|| AppError::bad_request("userId required"))?;
    ensure_owner(db, Owned::Comment, id, user_id).await?;
    repo::delete(db, id).await?;
    info!(comment_id = id, user_id, "comment deleted");
    Ok(())
}
