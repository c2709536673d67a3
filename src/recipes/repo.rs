use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::repo_types::{
    NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeSummary, Scope,
};
use crate::params::PageRequest;

const SUMMARY_COLUMNS: &str = "id, user_id, title, image, category, visibility, created_at";

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &RecipeFilter) {
    match filter.scope {
        Scope::Public => {
            qb.push(" WHERE visibility = 'public'");
        }
        Scope::Owner(user_id) => {
            qb.push(" WHERE user_id = ").push_bind(user_id);
        }
    }
    if let Some(category) = &filter.category {
        qb.push(" AND LOWER(category) = LOWER(")
            .push_bind(category.clone())
            .push(")");
    }
    if let Some(search) = &filter.search {
        let like = format!("%{}%", escape_like(&search.to_lowercase()));
        qb.push(" AND (LOWER(title) LIKE ")
            .push_bind(like.clone())
            .push(" ESCAPE '\\' OR LOWER(ingredients) LIKE ")
            .push_bind(like)
            .push(" ESCAPE '\\')");
    }
}

/// Escapes LIKE metacharacters so the search term matches literally.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub async fn list(
    db: &SqlitePool,
    filter: &RecipeFilter,
    page: PageRequest,
) -> sqlx::Result<Vec<RecipeSummary>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {SUMMARY_COLUMNS} FROM recipes"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);
    qb.build_query_as::<RecipeSummary>().fetch_all(db).await
}

pub async fn count(db: &SqlitePool, filter: &RecipeFilter) -> sqlx::Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipes");
    push_filters(&mut qb, filter);
    qb.build_query_scalar::<i64>().fetch_one(db).await
}

pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Recipe>> {
    sqlx::query_as::<_, Recipe>(
        r#"
        SELECT r.id, r.user_id, r.title, r.image, r.ingredients, r.instructions,
               r.description, r.category, r.visibility,
               (SELECT COUNT(*) FROM favorites f WHERE f.recipe_id = r.id) AS likes,
               r.created_at
          FROM recipes r
         WHERE r.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert(db: &SqlitePool, recipe: NewRecipe) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        INSERT INTO recipes
            (user_id, title, image, ingredients, instructions, description, category, visibility)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(recipe.user_id)
    .bind(recipe.title)
    .bind(recipe.image)
    .bind(recipe.ingredients)
    .bind(recipe.instructions)
    .bind(recipe.description)
    .bind(recipe.category)
    .bind(recipe.visibility.as_str())
    .fetch_one(db)
    .await
}

/// Writes only the supplied columns. Returns rows affected; a no-op change
/// set never reaches the database.
pub async fn update(db: &SqlitePool, id: i64, changes: RecipeChanges) -> sqlx::Result<u64> {
    if changes.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE recipes SET ");
    let mut sets = qb.separated(", ");
    if let Some(title) = changes.title {
        sets.push("title = ").push_bind_unseparated(title);
    }
    if let Some(ingredients) = changes.ingredients {
        sets.push("ingredients = ").push_bind_unseparated(ingredients);
    }
    if let Some(instructions) = changes.instructions {
        sets.push("instructions = ").push_bind_unseparated(instructions);
    }
    if let Some(description) = changes.description {
        sets.push("description = ").push_bind_unseparated(description);
    }
    if let Some(category) = changes.category {
        sets.push("category = ").push_bind_unseparated(category);
    }
    if let Some(visibility) = changes.visibility {
        sets.push("visibility = ").push_bind_unseparated(visibility.as_str());
    }
    if let Some(image) = changes.image {
        sets.push("image = ").push_bind_unseparated(image);
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb.build().execute(db).await?;
    Ok(res.rows_affected())
}

/// Removes the recipe together with its favorites and comments in one
/// transaction. Returns whether the recipe row existed.
pub async fn delete_cascade(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM favorites WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM comments WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let res = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
