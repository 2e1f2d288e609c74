use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default API key for the bootstrap admin (regenerate after first login)
pub const DEFAULT_ADMIN_API_KEY: &str = "lectern_default_api_key_please_regenerate";

/// Email of the bootstrap admin account
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@lectern.local";

/// Hash the default password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Profiles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Courses)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(CourseAssignments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(GeneratedContent)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One assignment per (course, lecturer) pair
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_assignments_course_lecturer")
                    .table(CourseAssignments)
                    .col(crate::entities::course_assignments::Column::CourseId)
                    .col(crate::entities::course_assignments::Column::LecturerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Content reads are always scoped to an owner
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_generated_content_lecturer")
                    .table(GeneratedContent)
                    .col(crate::entities::generated_content::Column::LecturerId)
                    .to_owned(),
            )
            .await?;

        // Seed bootstrap admin with hashed password
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Profiles)
            .columns([
                crate::entities::profiles::Column::Email,
                crate::entities::profiles::Column::FullName,
                crate::entities::profiles::Column::Role,
                crate::entities::profiles::Column::PasswordHash,
                crate::entities::profiles::Column::ApiKey,
                crate::entities::profiles::Column::CreatedAt,
                crate::entities::profiles::Column::UpdatedAt,
            ])
            .values_panic([
                DEFAULT_ADMIN_EMAIL.into(),
                "Administrator".into(),
                "admin".into(),
                password_hash.into(),
                DEFAULT_ADMIN_API_KEY.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedContent).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseAssignments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles).to_owned())
            .await?;

        Ok(())
    }
}
