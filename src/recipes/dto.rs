use serde::{Deserialize, Serialize};

use super::repo_types::{NewRecipe, RecipeChanges, RecipeSummary, Visibility};
use crate::error::{AppError, AppResult};
use crate::images::MultipartForm;
use crate::params::{clamp_text, non_blank, parse_id, PageParams, PageRequest};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 400;
pub const CATEGORY_MAX: usize = 40;
pub const INGREDIENTS_MAX: usize = 4000;
pub const INSTRUCTIONS_MAX: usize = 8000;

/// `?category=&q=&page=&limit=` plus the `/mine` extras `user_id` and `meta`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub user_id: Option<String>,
    pub meta: Option<String>,
}

impl ListQuery {
    pub fn paging(&self) -> PageRequest {
        PageParams {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
        .resolve()
    }

    pub fn category(&self) -> Option<String> {
        non_blank(self.category.as_deref()).map(str::to_string)
    }

    pub fn search(&self) -> Option<String> {
        non_blank(self.q.as_deref()).map(str::to_string)
    }

    pub fn wants_meta(&self) -> bool {
        self.meta.as_deref() == Some("1")
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}

/// `/mine` answers with a bare array, or `{items, total}` when `meta=1`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecipeListing {
    Items(Vec<RecipeSummary>),
    Page { items: Vec<RecipeSummary>, total: i64 },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecipeResponse {
    pub message: &'static str,
    pub recipe_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Recipe text fields pulled from a multipart body. Only keys that were
/// actually sent are `Some`; present values are trimmed and clamped.
#[derive(Debug, Default, Clone)]
pub struct RecipeForm {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<Visibility>,
}

impl RecipeForm {
    pub fn from_form(form: &MultipartForm) -> Self {
        let clamped = |name: &str, max: usize| form.text(name).map(|v| clamp_text(v, max));
        Self {
            user_id: form.text("user_id").and_then(parse_id),
            title: clamped("title", TITLE_MAX),
            ingredients: clamped("ingredients", INGREDIENTS_MAX),
            instructions: clamped("instructions", INSTRUCTIONS_MAX),
            description: clamped("description", DESCRIPTION_MAX),
            category: clamped("category", CATEGORY_MAX),
            visibility: form.text("visibility").map(Visibility::coerce),
        }
    }

    /// Checks the fields a new recipe cannot do without.
    pub fn validate_new(&self) -> AppResult<()> {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        if self.user_id.is_none()
            || !filled(&self.title)
            || !filled(&self.ingredients)
            || !filled(&self.instructions)
        {
            return Err(AppError::bad_request("Missing required fields"));
        }
        Ok(())
    }

    pub fn into_new(self, image: Option<String>) -> AppResult<NewRecipe> {
        self.validate_new()?;
        let missing = || AppError::bad_request("Missing required fields");
        Ok(NewRecipe {
            user_id: self.user_id.ok_or_else(missing)?,
            title: self.title.ok_or_else(missing)?,
            image,
            ingredients: self.ingredients.ok_or_else(missing)?,
            instructions: self.instructions.ok_or_else(missing)?,
            description: self.description.filter(|d| !d.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            visibility: self.visibility.unwrap_or_default(),
        })
    }

    /// Required columns sent empty are ignored; nullable ones sent empty are cleared.
    pub fn into_changes(self, image: Option<String>) -> RecipeChanges {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        let nullable = |v: Option<String>| v.map(|s| if s.is_empty() { None } else { Some(s) });
        RecipeChanges {
            title: non_empty(self.title),
            image,
            ingredients: non_empty(self.ingredients),
            instructions: non_empty(self.instructions),
            description: nullable(self.description),
            category: nullable(self.category),
            visibility: self.visibility,
        }
    }
}
