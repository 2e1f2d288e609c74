use serde::{Deserialize, Serialize};

use crate::db::{Assignment, ContentRecord, Course, Profile};
use crate::models::Role;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseDto {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            code: c.code,
            created_by: c.created_by,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentDto {
    pub id: i32,
    pub course_id: i32,
    pub lecturer_id: i32,
    pub assigned_by: i32,
    pub assigned_at: String,
}

impl From<Assignment> for AssignmentDto {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            lecturer_id: a.lecturer_id,
            assigned_by: a.assigned_by,
            assigned_at: a.assigned_at,
        }
    }
}

/// Full artifact record including the body and the prompt it was built from.
#[derive(Debug, Serialize)]
pub struct ContentDto {
    pub id: i32,
    pub course_id: i32,
    pub lecturer_id: i32,
    pub content_type: String,
    pub title: String,
    pub body: String,
    pub prompt_used: String,
    pub created_at: String,
}

impl From<ContentRecord> for ContentDto {
    fn from(r: ContentRecord) -> Self {
        Self {
            id: r.id,
            course_id: r.course_id,
            lecturer_id: r.lecturer_id,
            content_type: r.content_type,
            title: r.title,
            body: r.body,
            prompt_used: r.prompt_used,
            created_at: r.created_at,
        }
    }
}

/// Listing view that omits the (potentially large) body and prompt.
#[derive(Debug, Serialize)]
pub struct ContentSummaryDto {
    pub id: i32,
    pub course_id: i32,
    pub lecturer_id: i32,
    pub content_type: String,
    pub title: String,
    pub created_at: String,
}

impl From<ContentRecord> for ContentSummaryDto {
    fn from(r: ContentRecord) -> Self {
        Self {
            id: r.id,
            course_id: r.course_id,
            lecturer_id: r.lecturer_id,
            content_type: r.content_type,
            title: r.title,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub profiles: u64,
    pub courses: u64,
    pub assignments: usize,
    pub generated_artifacts: u64,
    pub inference_model: String,
    pub database_ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub course_id: i32,
    pub lecturer_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub course_id: i32,
    pub content_type: crate::models::ContentType,
    pub topic: String,
    pub extra_instructions: Option<String>,
}
