use crate::entities::{course_assignments, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Repository for lecturer-to-course assignment operations
pub struct AssignmentRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub id: i32,
    pub course_id: i32,
    pub lecturer_id: i32,
    pub assigned_by: i32,
    pub assigned_at: String,
}

impl From<course_assignments::Model> for Assignment {
    fn from(model: course_assignments::Model) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            lecturer_id: model.lecturer_id,
            assigned_by: model.assigned_by,
            assigned_at: model.assigned_at,
        }
    }
}

impl AssignmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        course_id: i32,
        lecturer_id: i32,
        assigned_by: i32,
    ) -> Result<Assignment> {
        let active = course_assignments::ActiveModel {
            course_id: Set(course_id),
            lecturer_id: Set(lecturer_id),
            assigned_by: Set(assigned_by),
            assigned_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert course assignment")?;

        info!(
            "Assigned lecturer {} to course {}",
            lecturer_id, course_id
        );
        Ok(Assignment::from(model))
    }

    pub async fn list_all(&self) -> Result<Vec<Assignment>> {
        let rows = CourseAssignments::find()
            .order_by_asc(course_assignments::Column::AssignedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assignments")?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    pub async fn list_for_lecturer(&self, lecturer_id: i32) -> Result<Vec<Assignment>> {
        let rows = CourseAssignments::find()
            .filter(course_assignments::Column::LecturerId.eq(lecturer_id))
            .order_by_asc(course_assignments::Column::AssignedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assignments for lecturer")?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    pub async fn list_for_course(&self, course_id: i32) -> Result<Vec<Assignment>> {
        let rows = CourseAssignments::find()
            .filter(course_assignments::Column::CourseId.eq(course_id))
            .order_by_asc(course_assignments::Column::AssignedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assignments for course")?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    /// True when the lecturer already holds an assignment for the course.
    pub async fn exists(&self, course_id: i32, lecturer_id: i32) -> Result<bool> {
        let count = CourseAssignments::find()
            .filter(course_assignments::Column::CourseId.eq(course_id))
            .filter(course_assignments::Column::LecturerId.eq(lecturer_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = CourseAssignments::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
