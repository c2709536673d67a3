use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Rows that carry an owning `user_id` and may only be mutated by that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owned {
    Recipe,
    Comment,
}

impl Owned {
    fn owner_sql(self) -> &'static str {
        match self {
            Owned::Recipe => "SELECT user_id FROM recipes WHERE id = ?",
            Owned::Comment => "SELECT user_id FROM comments WHERE id = ?",
        }
    }

    fn not_found(self) -> AppError {
        match self {
            Owned::Recipe => AppError::not_found("Recipe not found"),
            Owned::Comment => AppError::not_found("Comment not found"),
        }
    }

    fn forbidden(self) -> AppError {
        match self {
            Owned::Recipe => AppError::forbidden("Not your recipe"),
            Owned::Comment => AppError::forbidden("Forbidden (not owner)"),
        }
    }
}

/// Fails with NotFound when the row is missing and Forbidden when `user_id`
/// is not its owner. Reads only.
pub async fn ensure_owner(db: &SqlitePool, kind: Owned, id: i64, user_id: i64) -> AppResult<()> {
    let owner: Option<i64> = sqlx::query_scalar(kind.owner_sql())
        .bind(id)
        .fetch_optional(db)
        .await?;

    match owner {
        None => Err(kind.not_found()),
        Some(owner) if owner != user_id => {
            warn!(?kind, id, owner, user_id, "mutation by non-owner rejected");
            Err(kind.forbidden())
        }
        Some(_) => {
            debug!(?kind, id, user_id, "owner verified");
            Ok(())
        }
    }
}
