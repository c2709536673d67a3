use sqlx::SqlitePool;

/// Idempotent: an existing (user, recipe) pair is left alone. Returns
/// whether a new row was written.
pub async fn add(db: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query("INSERT OR IGNORE INTO favorites (user_id, recipe_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn count_for_recipe(db: &SqlitePool, recipe_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE recipe_id = ?")
        .bind(recipe_id)
        .fetch_one(db)
        .await
}
