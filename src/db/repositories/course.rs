use crate::entities::{courses, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Repository for course catalog operations
pub struct CourseRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<courses::Model> for Course {
    fn from(model: courses::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            code: model.code,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        code: &str,
        created_by: i32,
    ) -> Result<Course> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = courses::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.map(str::to_string)),
            code: Set(code.to_string()),
            created_by: Set(created_by),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert course")?;

        info!("Created course {} ({})", model.code, model.id);
        Ok(Course::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Course>> {
        let course = Courses::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query course")?;

        Ok(course.map(Course::from))
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Course>> {
        let course = Courses::find()
            .filter(courses::Column::Code.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to query course by code")?;

        Ok(course.map(Course::from))
    }

    pub async fn list(&self) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .order_by_asc(courses::Column::Code)
            .all(&self.conn)
            .await
            .context("Failed to list courses")?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Courses::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn update(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
        code: &str,
    ) -> Result<Option<Course>> {
        let Some(course) = Courses::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query course for update")?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: courses::ActiveModel = course.into();
        active.title = Set(title.to_string());
        active.description = Set(description.map(str::to_string));
        active.code = Set(code.to_string());
        active.updated_at = Set(now);

        let model = active.update(&self.conn).await?;
        Ok(Some(Course::from(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Courses::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
