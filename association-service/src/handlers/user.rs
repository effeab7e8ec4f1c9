use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{
    ActionResponse, AvatarResponse, ProfileResponse, UpdatePlatformsRequest, UpdateProfileRequest,
};
use crate::middleware::Identity;
use crate::models::{Platforms, User};
use crate::startup::AppState;

pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

const AVATAR_TOO_LARGE: &str = "Avatar too large (max 2MB)";

/// `GET /api/user/ping`: the caller's profile and current association.
pub async fn ping(
    State(state): State<AppState>,
    Identity(user): Identity,
) -> Result<Json<ProfileResponse>, AppError> {
    let association = state.associations.find_for_member(&user.id).await?;
    Ok(Json(ProfileResponse::new(user, association.as_ref())))
}

/// `POST /api/user/disconnect`: expire the session cookie. Safe to repeat.
pub async fn disconnect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ActionResponse>) {
    // `CookieJar::remove` is silent unless the request carried the cookie
    let mut expired = Cookie::build((state.config.auth.session_cookie.clone(), ""))
        .path("/")
        .http_only(true)
        .build();
    expired.make_removal();

    (jar.add(expired), Json(ActionResponse { success: true }))
}

/// `POST /api/user/update`: username and student name only.
pub async fn update_profile(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    req.validate()?;

    let updated = state
        .users
        .update_profile(&user.id, &req.username, &req.student.name)
        .await?;

    if !updated {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(Json(ActionResponse { success: true }))
}

/// `POST /api/user/update-platforms`
pub async fn update_platforms(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(req): Json<UpdatePlatformsRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    req.validate()?;

    let platforms = Platforms {
        discord: req.discord,
    };

    if !state.users.update_platforms(&user.id, &platforms).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    tracing::info!(user_id = %user.id, "Platforms updated");
    Ok(Json(ActionResponse { success: true }))
}

/// `POST /api/user/upload-avatar`: multipart field `file`, images only.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Identity(user): Identity,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let extension = image_extension(&content_type).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Unsupported avatar type: {}", content_type))
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file bytes", e))?;

        return store_avatar(&state, &user, extension, data.to_vec()).await;
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")))
}

async fn store_avatar(
    state: &AppState,
    user: &User,
    extension: &str,
    data: Vec<u8>,
) -> Result<Json<AvatarResponse>, AppError> {
    if data.len() > AVATAR_MAX_BYTES {
        return Err(AppError::PayloadTooLarge(AVATAR_TOO_LARGE.to_string()));
    }

    let size = data.len();
    let avatar = format!("{}.{}", Uuid::new_v4(), extension);
    let key = format!("{}/{}", user.id, avatar);

    state.avatars.store(&key, data).await.map_err(|e| {
        tracing::error!(user_id = %user.id, "Failed to store avatar: {}", e);
        e
    })?;

    if !state.users.update_avatar(&user.id, &avatar).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    // The previous file is unreachable now; failing to remove it is not the caller's problem
    if let Some(previous) = user.avatar.as_deref() {
        if let Err(e) = state
            .avatars
            .delete(&format!("{}/{}", user.id, previous))
            .await
        {
            tracing::warn!(user_id = %user.id, "Failed to delete previous avatar: {}", e);
        }
    }

    tracing::info!(user_id = %user.id, size, "Avatar uploaded");
    Ok(Json(AvatarResponse {
        success: true,
        avatar,
    }))
}

// A body over the route limit surfaces as a multipart read error
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(AVATAR_TOO_LARGE.to_string());
    }
    AppError::BadRequest(anyhow::anyhow!("{}: {}", context, e))
}

fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
