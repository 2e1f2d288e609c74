use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

use super::auth::{CurrentUser, require_admin};
use super::{
    ApiError, ApiResponse, AppState, CourseDto, CreateCourseRequest, NotificationEvent,
    UpdateCourseRequest,
};

/// GET /courses
/// List all courses. Any authenticated profile can read the catalog.
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CourseDto>>>, ApiError> {
    let courses = state.store().list_courses().await?;
    Ok(Json(ApiResponse::success(
        courses.into_iter().map(CourseDto::from).collect(),
    )))
}

/// GET /courses/{id}
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CourseDto>>, ApiError> {
    let course = state
        .store()
        .get_course(id)
        .await?
        .ok_or_else(|| ApiError::course_not_found(id))?;

    Ok(Json(ApiResponse::success(course.into())))
}

/// POST /courses
/// Create a course. Admin only; the course code must be unique.
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CourseDto>>), ApiError> {
    require_admin(&user)?;
    validate_course_fields(&payload.title, &payload.code)?;

    if state
        .store()
        .get_course_by_code(&payload.code)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Course code '{}' already exists",
            payload.code
        )));
    }

    let course = state
        .store()
        .create_course(
            &payload.title,
            payload.description.as_deref(),
            &payload.code,
            user.id,
        )
        .await?;

    info!("Course created: {} ({})", course.title, course.code);

    let _ = state.event_bus().send(NotificationEvent::CourseCreated {
        course_id: course.id,
        code: course.code.clone(),
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(course.into())),
    ))
}

/// PUT /courses/{id}
/// Update title, description, or code. Admin only.
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<ApiResponse<CourseDto>>, ApiError> {
    require_admin(&user)?;
    validate_course_fields(&payload.title, &payload.code)?;

    // Reusing another course's code is a conflict
    if let Some(existing) = state.store().get_course_by_code(&payload.code).await?
        && existing.id != id
    {
        return Err(ApiError::Conflict(format!(
            "Course code '{}' already exists",
            payload.code
        )));
    }

    let course = state
        .store()
        .update_course(id, &payload.title, payload.description.as_deref(), &payload.code)
        .await?
        .ok_or_else(|| ApiError::course_not_found(id))?;

    Ok(Json(ApiResponse::success(course.into())))
}

/// DELETE /courses/{id}
/// Remove a course and (via cascade) its assignments. Admin only.
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&user)?;

    let removed = state.store().remove_course(id).await?;
    if !removed {
        return Err(ApiError::course_not_found(id));
    }

    info!("Course {id} deleted");

    let _ = state
        .event_bus()
        .send(NotificationEvent::CourseDeleted { course_id: id });

    Ok(Json(ApiResponse::success(())))
}

fn validate_course_fields(title: &str, code: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Course title is required"));
    }
    if code.trim().is_empty() {
        return Err(ApiError::validation("Course code is required"));
    }
    Ok(())
}
