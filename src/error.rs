use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;

/// Which unique column of `users` a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Email,
    Username,
}

impl ConflictField {
    pub fn message(self) -> &'static str {
        match self {
            ConflictField::Email => "Email already in use",
            ConflictField::Username => "Username already in use",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", .0.message())]
    Conflict(ConflictField),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::not_found("Not found"),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => match conflict_field(db_err.message()) {
                    Some(field) => AppError::Conflict(field),
                    None => AppError::Internal(e.into()),
                },
                ErrorKind::ForeignKeyViolation => {
                    AppError::not_found("Referenced user or recipe not found")
                }
                _ => AppError::Internal(e.into()),
            },
            _ => AppError::Internal(e.into()),
        }
    }
}

/// Picks the offending column out of a unique-constraint message such as
/// `UNIQUE constraint failed: users.email`.
pub(crate) fn conflict_field(message: &str) -> Option<ConflictField> {
    let msg = message.to_ascii_lowercase();
    if !msg.contains("unique") {
        return None;
    }
    if msg.contains("email") {
        Some(ConflictField::Email)
    } else if msg.contains("username") {
        Some(ConflictField::Username)
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_field_reads_sqlite_messages() {
        assert_eq!(
            conflict_field("UNIQUE constraint failed: users.email"),
            Some(ConflictField::Email)
        );
        assert_eq!(
            conflict_field("UNIQUE constraint failed: users.username"),
            Some(ConflictField::Username)
        );
        assert_eq!(
            conflict_field("UNIQUE constraint failed: favorites.user_id, favorites.recipe_id"),
            None
        );
        assert_eq!(conflict_field("NOT NULL constraint failed: users.email"), None);
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AppError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict(ConflictField::Email).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_message_names_the_column() {
        assert_eq!(
            AppError::Conflict(ConflictField::Username).to_string(),
            "Username already in use"
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
