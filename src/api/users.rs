use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::info;

use super::auth::{CurrentUser, require_admin};
use super::{ApiError, ApiResponse, AppState, ProfileDto, UpdateRoleRequest};

/// GET /users
/// List all profiles. Admin only.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ProfileDto>>>, ApiError> {
    require_admin(&user)?;

    let profiles = state.store().list_profiles().await?;
    Ok(Json(ApiResponse::success(
        profiles.into_iter().map(ProfileDto::from).collect(),
    )))
}

/// PUT /users/{id}/role
/// Promote or demote a profile. Admin only; an admin cannot demote
/// themselves, which keeps at least one admin reachable.
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    require_admin(&user)?;

    if id == user.id && !payload.role.is_admin() {
        return Err(ApiError::validation("Admins cannot demote themselves"));
    }

    let updated = state.store().update_profile_role(id, payload.role).await?;
    if !updated {
        return Err(ApiError::not_found("Profile", id));
    }

    let profile = state
        .store()
        .get_profile(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile", id))?;

    info!("Role for profile {} set to {}", id, profile.role);

    Ok(Json(ApiResponse::success(profile.into())))
}
