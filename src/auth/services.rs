use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::{
    dto::{LoginRequest, LoginResponse, Profile, ProfileUpdate, RegisterRequest},
    password::{hash_password, verify_password},
    repo_types::{ProfileChanges, User},
};
use crate::error::{AppError, AppResult};

pub const USERNAME_RULES: &str = "Username must be 3–30 chars (letters/numbers/_)";
pub const PASSWORD_RULES: &str = "Password must be 8–72 chars";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub(crate) fn is_valid_password(password: &str) -> bool {
    (8..=72).contains(&password.chars().count())
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validates, hashes and inserts a new user; returns the new id.
pub async fn register(db: &SqlitePool, req: RegisterRequest) -> AppResult<i64> {
    let username = req.username.trim().to_string();
    let email = normalize_email(&req.email);

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }
    if !is_valid_username(&username) {
        warn!(%username, "invalid username");
        return Err(AppError::bad_request(USERNAME_RULES));
    }
    if !is_valid_password(&req.password) {
        warn!("password length out of range");
        return Err(AppError::bad_request(PASSWORD_RULES));
    }

    let hash = hash_password(&req.password)?;
    let id = User::create(db, &username, &email, &hash).await?;
    info!(user_id = id, %username, %email, "user registered");
    Ok(id)
}

pub async fn login(db: &SqlitePool, req: LoginRequest) -> AppResult<LoginResponse> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) || req.password.is_empty() {
        warn!(%email, "malformed login");
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::not_found("User not found"));
    };

    if !verify_password(&req.password, &user.password)? {
        warn!(%email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized("Incorrect password".into()));
    }

    info!(user_id = user.id, %email, "user logged in");
    Ok(LoginResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        avatar: user.avatar,
    })
}

pub async fn profile(db: &SqlitePool, id: i64) -> AppResult<Profile> {
    User::find_by_id(db, id)
        .await?
        .map(Profile::from)
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Field-level checks for a profile update, run before any side effect.
pub fn validate_profile_update(update: &ProfileUpdate) -> AppResult<()> {
    if let Some(username) = &update.username {
        if !is_valid_username(username.trim()) {
            return Err(AppError::bad_request(USERNAME_RULES));
        }
    }
    if let Some(password) = &update.password {
        if password.is_empty() {
            return Err(AppError::bad_request("Password cannot be empty"));
        }
        if !is_valid_password(password) {
            return Err(AppError::bad_request(PASSWORD_RULES));
        }
    }
    Ok(())
}

/// Applies a validated update. `avatar` is the public path of an already
/// stored image. Returns `false` when there was nothing to change.
pub async fn update_profile(
    db: &SqlitePool,
    id: i64,
    update: ProfileUpdate,
    avatar: Option<String>,
) -> AppResult<bool> {
    validate_profile_update(&update)?;

    let password_hash = update
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;
    let changes = ProfileChanges {
        username: update.username.map(|u| u.trim().to_string()),
        bio: update.bio.map(|b| b.trim().to_string()),
        avatar,
        password_hash,
    };
    if changes.is_empty() {
        return Ok(false);
    }

    let affected = User::update_profile(db, id, changes).await?;
    if affected == 0 {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id = id, "profile updated");
    Ok(true)
}
