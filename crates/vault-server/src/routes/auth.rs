//! Registration and login

use crate::error::{ApiError, ApiResult};
use crate::services::hashing;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use vault_core::api::{Credentials, LoginResponse, MessageResponse};

/// Create an account
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Cheap check first so taken names skip the hash
    if state.store.user(username).await.is_some() {
        return Err(ApiError::UserExists);
    }

    let hash = hashing::hash_password(req.password).await?;
    if !state.store.add_user(username, hash).await? {
        return Err(ApiError::UserExists);
    }

    tracing::info!("Registered user {}", username);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

/// Check a username/password pair
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let username = req.username.trim();
    let user = state
        .store
        .user(username)
        .await
        .ok_or(ApiError::InvalidCredentials)?;

    if !hashing::verify_password(req.password, user.password_hash).await? {
        tracing::warn!("Failed login for {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!("User {} logged in", username);
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username: user.username,
    }))
}
