//! User profile and avatar upload

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use std::sync::Arc;
use vault_core::api::{Profile, ProfileUpdateResponse, UserQuery};

/// GET /api/profile?username=
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Profile>> {
    let username = query
        .username
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    state
        .store
        .profile(&username)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Profile not found"))
}

/// Update email and, optionally, the avatar
///
/// POST /api/profile (multipart: `username`, `email`, `avatar`)
///
/// Without a new avatar the previously stored one is kept.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProfileUpdateResponse>> {
    let mut username = None;
    let mut email = String::new();
    let mut avatar: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => username = Some(read_text(field).await?),
            "email" => email = read_text(field).await?,
            "avatar" => {
                let filename = field.file_name().unwrap_or("avatar").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if !bytes.is_empty() {
                    avatar = Some((filename, bytes.to_vec()));
                }
            }
            other => tracing::debug!("Ignoring profile field {}", other),
        }
    }

    let username = username
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let previous = state.store.profile(&username).await;
    let avatar_url = match avatar {
        Some((filename, bytes)) => {
            let stored_name = format!(
                "{}_{}",
                sanitize_filename(&username),
                sanitize_filename(&filename)
            );
            let path = state.config.storage.upload_directory.join(&stored_name);
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| ApiError::Store(e.into()))?;
            tracing::info!("Stored avatar for {} at {:?}", username, path);
            Some(state.upload_url(&stored_name))
        }
        None => previous.and_then(|p| p.avatar_url),
    };

    state
        .store
        .upsert_profile(Profile {
            username,
            email,
            avatar_url: avatar_url.clone(),
        })
        .await?;

    Ok(Json(ProfileUpdateResponse {
        message: "Profile updated".to_string(),
        avatar_url,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Reduce an uploaded name to a single safe path component
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("me.png"), "me.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\my face.jpg"), "my_face.jpg");
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }
}
