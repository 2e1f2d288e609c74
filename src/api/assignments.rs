use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

use super::auth::{CurrentUser, require_admin};
use super::{
    ApiError, ApiResponse, AppState, AssignmentDto, CreateAssignmentRequest, NotificationEvent,
};
use crate::models::Role;

/// GET /assignments
/// Admins see every assignment; lecturers see only their own.
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<AssignmentDto>>>, ApiError> {
    let assignments = if user.role.is_admin() {
        state.store().list_assignments().await?
    } else {
        state.store().list_assignments_for_lecturer(user.id).await?
    };

    Ok(Json(ApiResponse::success(
        assignments.into_iter().map(AssignmentDto::from).collect(),
    )))
}

/// GET /courses/{id}/assignments
/// List the lecturers assigned to a course. Admin only.
pub async fn list_for_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(course_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<AssignmentDto>>>, ApiError> {
    require_admin(&user)?;

    if state.store().get_course(course_id).await?.is_none() {
        return Err(ApiError::course_not_found(course_id));
    }

    let assignments = state.store().list_assignments_for_course(course_id).await?;
    Ok(Json(ApiResponse::success(
        assignments.into_iter().map(AssignmentDto::from).collect(),
    )))
}

/// POST /assignments
/// Assign a lecturer to a course. Admin only; the (course, lecturer) pair
/// must not already exist.
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentDto>>), ApiError> {
    require_admin(&user)?;

    if state.store().get_course(payload.course_id).await?.is_none() {
        return Err(ApiError::course_not_found(payload.course_id));
    }

    let lecturer = state
        .store()
        .get_profile(payload.lecturer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile", payload.lecturer_id))?;

    if lecturer.role != Role::Lecturer {
        return Err(ApiError::validation(
            "Only lecturer profiles can be assigned to courses",
        ));
    }

    if state
        .store()
        .assignment_exists(payload.course_id, payload.lecturer_id)
        .await?
    {
        return Err(ApiError::Conflict(format!(
            "Lecturer {} is already assigned to course {}",
            payload.lecturer_id, payload.course_id
        )));
    }

    let assignment = state
        .store()
        .create_assignment(payload.course_id, payload.lecturer_id, user.id)
        .await?;

    info!(
        "Lecturer {} assigned to course {}",
        assignment.lecturer_id, assignment.course_id
    );

    let _ = state.event_bus().send(NotificationEvent::AssignmentCreated {
        course_id: assignment.course_id,
        lecturer_id: assignment.lecturer_id,
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(assignment.into())),
    ))
}

/// DELETE /assignments/{id}
/// Revoke an assignment. Admin only.
pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&user)?;

    let removed = state.store().remove_assignment(id).await?;
    if !removed {
        return Err(ApiError::not_found("Assignment", id));
    }

    info!("Assignment {id} revoked");

    Ok(Json(ApiResponse::success(())))
}
