use sqlx::SqlitePool;

use super::dto::CommentView;

pub async fn insert(
    db: &SqlitePool,
    recipe_id: i64,
    user_id: i64,
    content: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        INSERT INTO comments (content, recipe_id, user_id)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(content)
    .bind(recipe_id)
    .bind(user_id)
    .fetch_one(db)
    .await
}

/// Newest first, with the author's username.
pub async fn list_for_recipe(db: &SqlitePool, recipe_id: i64) -> sqlx::Result<Vec<CommentView>> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.user_id, c.content, c.created_at, u.username
          FROM comments c
          JOIN users u ON u.id = c.user_id
         WHERE c.recipe_id = ?
         ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
}

pub async fn update_content(db: &SqlitePool, id: i64, content: &str) -> sqlx::Result<u64> {
    let res = sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
        .bind(content)
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
