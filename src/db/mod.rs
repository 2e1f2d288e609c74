use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::{ContentType, Role};

pub mod migrator;
pub mod repositories;

pub use repositories::assignment::Assignment;
pub use repositories::content::{ContentFilter, ContentRecord};
pub use repositories::course::Course;
pub use repositories::profile::Profile;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn profile_repo(&self) -> repositories::profile::ProfileRepository {
        repositories::profile::ProfileRepository::new(self.conn.clone())
    }

    fn course_repo(&self) -> repositories::course::CourseRepository {
        repositories::course::CourseRepository::new(self.conn.clone())
    }

    fn assignment_repo(&self) -> repositories::assignment::AssignmentRepository {
        repositories::assignment::AssignmentRepository::new(self.conn.clone())
    }

    fn content_repo(&self) -> repositories::content::ContentRepository {
        repositories::content::ContentRepository::new(self.conn.clone())
    }

    // ========== Profiles ==========

    pub async fn create_profile(
        &self,
        email: &str,
        full_name: &str,
        role: Role,
        password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<Profile> {
        self.profile_repo()
            .create(email, full_name, role, password, security)
            .await
    }

    pub async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        self.profile_repo().get_by_email(email).await
    }

    pub async fn get_profile(&self, id: i32) -> Result<Option<Profile>> {
        self.profile_repo().get_by_id(id).await
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.profile_repo().list().await
    }

    pub async fn profile_count(&self) -> Result<u64> {
        self.profile_repo().count().await
    }

    pub async fn verify_profile_password(&self, email: &str, password: &str) -> Result<bool> {
        self.profile_repo().verify_password(email, password).await
    }

    pub async fn update_profile_password(
        &self,
        email: &str,
        new_password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.profile_repo()
            .update_password(email, new_password, security)
            .await
    }

    pub async fn update_profile_role(&self, id: i32, role: Role) -> Result<bool> {
        self.profile_repo().update_role(id, role).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<Profile>> {
        self.profile_repo().verify_api_key(api_key).await
    }

    pub async fn get_profile_api_key(&self, email: &str) -> Result<Option<String>> {
        self.profile_repo().get_api_key(email).await
    }

    pub async fn regenerate_profile_api_key(&self, email: &str) -> Result<String> {
        self.profile_repo().regenerate_api_key(email).await
    }

    // ========== Courses ==========

    pub async fn create_course(
        &self,
        title: &str,
        description: Option<&str>,
        code: &str,
        created_by: i32,
    ) -> Result<Course> {
        self.course_repo()
            .create(title, description, code, created_by)
            .await
    }

    pub async fn get_course(&self, id: i32) -> Result<Option<Course>> {
        self.course_repo().get(id).await
    }

    pub async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.course_repo().get_by_code(code).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        self.course_repo().list().await
    }

    pub async fn course_count(&self) -> Result<u64> {
        self.course_repo().count().await
    }

    pub async fn update_course(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
        code: &str,
    ) -> Result<Option<Course>> {
        self.course_repo().update(id, title, description, code).await
    }

    pub async fn remove_course(&self, id: i32) -> Result<bool> {
        self.course_repo().remove(id).await
    }

    // ========== Course assignments ==========

    pub async fn create_assignment(
        &self,
        course_id: i32,
        lecturer_id: i32,
        assigned_by: i32,
    ) -> Result<Assignment> {
        self.assignment_repo()
            .create(course_id, lecturer_id, assigned_by)
            .await
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        self.assignment_repo().list_all().await
    }

    pub async fn list_assignments_for_lecturer(&self, lecturer_id: i32) -> Result<Vec<Assignment>> {
        self.assignment_repo().list_for_lecturer(lecturer_id).await
    }

    pub async fn list_assignments_for_course(&self, course_id: i32) -> Result<Vec<Assignment>> {
        self.assignment_repo().list_for_course(course_id).await
    }

    pub async fn assignment_exists(&self, course_id: i32, lecturer_id: i32) -> Result<bool> {
        self.assignment_repo().exists(course_id, lecturer_id).await
    }

    pub async fn remove_assignment(&self, id: i32) -> Result<bool> {
        self.assignment_repo().remove(id).await
    }

    // ========== Generated content ==========

    pub async fn insert_content(
        &self,
        course_id: i32,
        lecturer_id: i32,
        content_type: ContentType,
        title: &str,
        body: &str,
        prompt_used: &str,
    ) -> Result<ContentRecord> {
        self.content_repo()
            .insert(course_id, lecturer_id, content_type, title, body, prompt_used)
            .await
    }

    pub async fn get_content(&self, id: i32, owner: Option<i32>) -> Result<Option<ContentRecord>> {
        self.content_repo().get(id, owner).await
    }

    pub async fn list_content(&self, filter: &ContentFilter) -> Result<Vec<ContentRecord>> {
        self.content_repo().list(filter).await
    }

    pub async fn content_count(&self) -> Result<u64> {
        self.content_repo().count().await
    }
}
