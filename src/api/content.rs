use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    ApiError, ApiResponse, AppState, ContentDto, ContentSummaryDto, GenerateContentRequest,
};
use crate::db::ContentFilter;
use crate::models::ContentType;
use crate::services::GenerationRequest;

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub course_id: Option<i32>,
    pub content_type: Option<ContentType>,
}

/// POST /content/generate
/// Run one inference call and store the resulting artifact. Lecturers must
/// be assigned to the course; admins may target any course.
pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<GenerateContentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContentDto>>), ApiError> {
    let record = state
        .generation()
        .generate(
            user.id,
            user.role,
            GenerationRequest {
                course_id: payload.course_id,
                content_type: payload.content_type,
                topic: payload.topic,
                extra_instructions: payload.extra_instructions,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(record.into())),
    ))
}

/// GET /content
/// List stored artifacts without their bodies. Lecturers only ever see
/// rows they generated themselves; admins see everything.
pub async fn list_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ApiResponse<Vec<ContentSummaryDto>>>, ApiError> {
    let filter = ContentFilter {
        owner: owner_scope(&user),
        course_id: query.course_id,
        content_type: query.content_type,
    };

    let records = state.store().list_content(&filter).await?;
    Ok(Json(ApiResponse::success(
        records.into_iter().map(ContentSummaryDto::from).collect(),
    )))
}

/// GET /content/{id}
/// Fetch a full artifact. A row owned by someone else is reported as not
/// found rather than forbidden, so its existence is not leaked.
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ContentDto>>, ApiError> {
    let record = state
        .store()
        .get_content(id, owner_scope(&user))
        .await?
        .ok_or_else(|| ApiError::not_found("Content", id))?;

    Ok(Json(ApiResponse::success(record.into())))
}

/// Admins read unscoped; lecturers are pinned to their own rows.
fn owner_scope(user: &CurrentUser) -> Option<i32> {
    if user.role.is_admin() {
        None
    } else {
        Some(user.id)
    }
}
