//! Orchestrates a single generation: authorization check, prompt assembly,
//! one inference call, then the append-only insert.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::NotificationEvent;
use crate::clients::inference::{InferenceClient, InferenceError};
use crate::db::{ContentRecord, Store};
use crate::models::{ContentType, Role};

use super::prompts;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Course {0} not found")]
    CourseNotFound(i32),

    #[error("Lecturer is not assigned to course {0}")]
    NotAssigned(i32),

    #[error("Topic is required")]
    EmptyTopic,

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub course_id: i32,
    pub content_type: ContentType,
    pub topic: String,
    pub extra_instructions: Option<String>,
}

pub struct GenerationService {
    store: Store,
    client: Arc<InferenceClient>,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl GenerationService {
    #[must_use]
    pub const fn new(
        store: Store,
        client: Arc<InferenceClient>,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            client,
            event_bus,
        }
    }

    /// Runs a generation for the given caller and stores the artifact.
    ///
    /// Lecturers must hold an assignment for the course; admins are exempt.
    pub async fn generate(
        &self,
        caller_id: i32,
        caller_role: Role,
        request: GenerationRequest,
    ) -> Result<ContentRecord, GenerationError> {
        if request.topic.trim().is_empty() {
            return Err(GenerationError::EmptyTopic);
        }

        let course = self
            .store
            .get_course(request.course_id)
            .await?
            .ok_or(GenerationError::CourseNotFound(request.course_id))?;

        if !caller_role.is_admin()
            && !self
                .store
                .assignment_exists(course.id, caller_id)
                .await?
        {
            return Err(GenerationError::NotAssigned(course.id));
        }

        let system = prompts::system_prompt(request.content_type);
        let user = prompts::user_prompt(
            request.content_type,
            &course,
            request.topic.trim(),
            request.extra_instructions.as_deref(),
        );

        let generation_id = Uuid::new_v4();
        info!(
            generation_id = %generation_id,
            course_id = course.id,
            content_type = %request.content_type,
            model = self.client.model(),
            "Starting generation"
        );

        let body = self.client.complete(system, &user).await.inspect_err(|e| {
            warn!(generation_id = %generation_id, "Generation failed: {e}");
        })?;

        let title = prompts::artifact_title(request.content_type, &course, request.topic.trim());

        let record = self
            .store
            .insert_content(
                course.id,
                caller_id,
                request.content_type,
                &title,
                &body,
                &user,
            )
            .await?;

        info!(
            generation_id = %generation_id,
            content_id = record.id,
            "Generation stored"
        );

        let _ = self.event_bus.send(NotificationEvent::ContentGenerated {
            content_id: record.id,
            course_id: course.id,
            lecturer_id: caller_id,
            content_type: request.content_type.as_str().to_string(),
        });

        Ok(record)
    }
}
