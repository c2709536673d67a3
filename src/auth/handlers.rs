use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, Profile, ProfileUpdate,
            RegisterRequest, RegisterResponse,
        },
        services,
    },
    error::{AppError, AppResult},
    extract::JsonBody,
    images::{services::discard_image, services::store_image, MultipartForm},
    params::parse_id,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me/:id", get(get_me).post(update_me))
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let id = services::register(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    services::login(&state.db, payload).await.map(Json)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Profile>> {
    let id = parse_id(&id).ok_or_else(|| AppError::bad_request("Invalid id"))?;
    services::profile(&state.db, id).await.map(Json)
}

/// POST /auth/me/:id (multipart)
/// Fields: username?, bio?, password?; file field: avatar?
#[instrument(skip(state, mp))]
pub async fn update_me(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mp: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id).ok_or_else(|| AppError::bad_request("Invalid id"))?;
    let mut form = MultipartForm::read(mp).await?;

    let update = ProfileUpdate {
        username: form.text("username").map(str::to_string),
        bio: form.text("bio").map(str::to_string),
        password: form.text("password").map(str::to_string),
    };
    services::validate_profile_update(&update)?;

    let previous = services::profile(&state.db, id).await?;

    let avatar = match form.take_file("avatar") {
        Some(file) => Some(
            store_image(state.storage.as_ref(), state.config.uploads.max_bytes, file).await?,
        ),
        None => None,
    };

    match services::update_profile(&state.db, id, update, avatar.clone()).await {
        Ok(true) => {
            if avatar.is_some() {
                discard_image(state.storage.as_ref(), previous.avatar.as_deref()).await;
            }
            Ok(Json(MessageResponse {
                message: "Profile updated",
            }))
        }
        Ok(false) => Ok(Json(MessageResponse {
            message: "Nothing to update",
        })),
        Err(e) => {
            warn!(error = %e, user_id = id, "profile update failed");
            discard_image(state.storage.as_ref(), avatar.as_deref()).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn test_profile_serialization() {
        let response = Profile {
            id: 7,
            username: "chef".into(),
            email: "test@example.com".to_string(),
            bio: None,
            avatar: Some("/uploads/a.png".into()),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["avatar"], "/uploads/a.png");
        assert!(json["bio"].is_null());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn login_response_uses_camel_case_user_id() {
        let json = serde_json::to_value(LoginResponse {
            user_id: 3,
            username: "chef".into(),
            email: "c@x.io".into(),
            avatar: None,
        })
        .unwrap();
        assert_eq!(json["userId"], 3);
        assert!(json.get("user_id").is_none());
    }
}
