use crate::auth::repo_types::{ProfileChanges, User};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, password, bio, avatar, created_at";

impl User {
    /// Find a user by (already normalised) email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Insert a new user with an already hashed password; returns the new id.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Applies only the present columns. Returns rows affected (0 when the
    /// user does not exist or nothing was supplied).
    pub async fn update_profile(
        db: &SqlitePool,
        id: i64,
        changes: ProfileChanges,
    ) -> sqlx::Result<u64> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut sets = qb.separated(", ");
        if let Some(username) = changes.username {
            sets.push("username = ").push_bind_unseparated(username);
        }
        if let Some(bio) = changes.bio {
            sets.push("bio = ").push_bind_unseparated(bio);
        }
        if let Some(avatar) = changes.avatar {
            sets.push("avatar = ").push_bind_unseparated(avatar);
        }
        if let Some(hash) = changes.password_hash {
            sets.push("password = ").push_bind_unseparated(hash);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let res = qb.build().execute(db).await?;
        Ok(res.rows_affected())
    }
}
