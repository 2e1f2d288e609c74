use crate::entities::{generated_content, prelude::*};
use crate::models::ContentType;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// Repository for the append-only generated content history.
///
/// Every read is scoped to an owner unless the caller is an admin; this is
/// the application-level stand-in for the original row-level security
/// policy on this table.
pub struct ContentRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub id: i32,
    pub course_id: i32,
    pub lecturer_id: i32,
    pub content_type: String,
    pub title: String,
    pub body: String,
    pub prompt_used: String,
    pub created_at: String,
}

impl From<generated_content::Model> for ContentRecord {
    fn from(model: generated_content::Model) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            lecturer_id: model.lecturer_id,
            content_type: model.content_type,
            title: model.title,
            body: model.body,
            prompt_used: model.prompt_used,
            created_at: model.created_at,
        }
    }
}

/// Filters applied when listing content. `owner` of `None` means the caller
/// may see every row (admin path).
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub owner: Option<i32>,
    pub course_id: Option<i32>,
    pub content_type: Option<ContentType>,
}

impl ContentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        course_id: i32,
        lecturer_id: i32,
        content_type: ContentType,
        title: &str,
        body: &str,
        prompt_used: &str,
    ) -> Result<ContentRecord> {
        let active = generated_content::ActiveModel {
            course_id: Set(course_id),
            lecturer_id: Set(lecturer_id),
            content_type: Set(content_type.as_str().to_string()),
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            prompt_used: Set(prompt_used.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert generated content")?;

        Ok(ContentRecord::from(model))
    }

    /// Fetch a single row, enforcing ownership when `owner` is set.
    /// A row owned by someone else is indistinguishable from a missing row.
    pub async fn get(&self, id: i32, owner: Option<i32>) -> Result<Option<ContentRecord>> {
        let mut query = GeneratedContent::find_by_id(id);

        if let Some(lecturer_id) = owner {
            query = query.filter(generated_content::Column::LecturerId.eq(lecturer_id));
        }

        let row = query
            .one(&self.conn)
            .await
            .context("Failed to query generated content")?;

        Ok(row.map(ContentRecord::from))
    }

    pub async fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentRecord>> {
        let mut query = GeneratedContent::find();

        if let Some(lecturer_id) = filter.owner {
            query = query.filter(generated_content::Column::LecturerId.eq(lecturer_id));
        }
        if let Some(course_id) = filter.course_id {
            query = query.filter(generated_content::Column::CourseId.eq(course_id));
        }
        if let Some(content_type) = filter.content_type {
            query = query.filter(generated_content::Column::ContentType.eq(content_type.as_str()));
        }

        let rows = query
            .order_by_desc(generated_content::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list generated content")?;

        Ok(rows.into_iter().map(ContentRecord::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = GeneratedContent::find().count(&self.conn).await?;
        Ok(count)
    }
}
