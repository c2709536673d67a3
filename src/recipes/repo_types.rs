use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Anything other than `public`/`private` becomes `public`.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

/// Row shape used by the list endpoints.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Full recipe row. `likes` is the current favorites count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
    pub likes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub user_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
}

/// Partial update. Outer `None` leaves a column alone; for the nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.visibility.is_none()
    }
}

/// Who a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Public recipes from everyone.
    Public,
    /// Everything one user owns, whatever its visibility.
    Owner(i64),
}

#[derive(Debug, Clone)]
pub struct RecipeFilter {
    pub scope: Scope,
    pub category: Option<String>,
    pub search: Option<String>,
}
