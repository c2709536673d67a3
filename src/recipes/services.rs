use sqlx::SqlitePool;
use tracing::info;

use super::dto::{ListQuery, RecipeListing};
use super::repo;
use super::repo_types::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeSummary, Scope};
use crate::error::{AppError, AppResult};
use crate::ownership::{ensure_owner, Owned};

pub async fn list_public(db: &SqlitePool, query: &ListQuery) -> AppResult<Vec<RecipeSummary>> {
    let filter = RecipeFilter {
        scope: Scope::Public,
        category: query.category(),
        search: query.search(),
    };
    Ok(repo::list(db, &filter, query.paging()).await?)
}

pub async fn list_mine(db: &SqlitePool, user_id: i64, query: &ListQuery) -> AppResult<RecipeListing> {
    let filter = RecipeFilter {
        scope: Scope::Owner(user_id),
        category: query.category(),
        search: query.search(),
    };
    let items = repo::list(db, &filter, query.paging()).await?;
    if query.wants_meta() {
        let total = repo::count(db, &filter).await?;
        Ok(RecipeListing::Page { items, total })
    } else {
        Ok(RecipeListing::Items(items))
    }
}

pub async fn get(db: &SqlitePool, id: i64) -> AppResult<Recipe> {
    repo::get(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))
}

pub async fn create(db: &SqlitePool, recipe: NewRecipe) -> AppResult<i64> {
    let user_id = recipe.user_id;
    let id = repo::insert(db, recipe).await?;
    info!(recipe_id = id, user_id, "recipe created");
    Ok(id)
}

/// Owner-gated partial update. Returns the replaced image path when the
/// update swapped the image, so the caller can drop the old file.
pub async fn update(
    db: &SqlitePool,
    id: i64,
    user_id: i64,
    changes: RecipeChanges,
) -> AppResult<UpdateOutcome> {
    ensure_owner(db, Owned::Recipe, id, user_id).await?;
    if changes.is_empty() {
        return Ok(UpdateOutcome::Unchanged);
    }

    let previous_image = match changes.image {
        Some(_) => repo::get(db, id).await?.and_then(|r| r.image),
        None => None,
    };
    repo::update(db, id, changes).await?;
    info!(recipe_id = id, user_id, "recipe updated");
    Ok(UpdateOutcome::Updated { previous_image })
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Unchanged,
    Updated { previous_image: Option<String> },
}

/// Owner-gated delete of the recipe and everything hanging off it.
/// Returns the recipe's image path, if any.
pub async fn delete(db: &SqlitePool, id: i64, user_id: i64) -> AppResult<Option<String>> {
    ensure_owner(db, Owned::Recipe, id, user_id).await?;
    let image = repo::get(db, id).await?.and_then(|r| r.image);
    if !repo::delete_cascade(db, id).await? {
        return Err(AppError::not_found("Recipe not found"));
    }
    info!(recipe_id = id, user_id, "recipe deleted");
    Ok(image)
}
