//! Stored service passwords

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use vault_core::api::{
    DeletePasswordRequest, MessageResponse, SavePasswordRequest, ServiceCredential,
    UpdatePasswordRequest, UserQuery,
};

/// Username the request acts for; requests without one are refused
fn require_user(username: Option<String>) -> ApiResult<String> {
    username
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::Unauthorized)
}

/// GET /api/passwords?username=
pub async fn list_passwords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<ServiceCredential>>> {
    let username = require_user(query.username)?;
    Ok(Json(state.store.passwords(&username).await))
}

/// POST /api/passwords
pub async fn save_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePasswordRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let username = require_user(req.username)?;

    state
        .store
        .add_password(ServiceCredential {
            username,
            service: req.service,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Password saved"))))
}

/// POST /api/passwords/delete
pub async fn delete_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeletePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let username = require_user(req.username)?;
    let removed = state.store.delete_password(&username, &req.service).await?;
    tracing::debug!("Deleted {} entries for {}/{}", removed, username, req.service);

    Ok(Json(MessageResponse::new("Password deleted")))
}

/// PUT /api/passwords
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (Some(username), Some(service), Some(new_password)) = (
        req.username.filter(|v| !v.is_empty()),
        req.service.filter(|v| !v.is_empty()),
        req.new_password.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Username, service, and new_password are required".to_string(),
        ));
    };

    if state
        .store
        .update_password(&username, &service, &new_password)
        .await?
    {
        Ok(Json(MessageResponse::new("Password updated")))
    } else {
        Err(ApiError::NotFound("Password not found"))
    }
}
