use sea_orm::entity::prelude::*;

/// Append-only history of generated artifacts. Rows are never updated or
/// deleted in normal operation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "generated_content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub course_id: i32,

    pub lecturer_id: i32,

    /// "lesson", "assignment", "quiz" or "notes"
    pub content_type: String,

    pub title: String,

    /// The generated text itself
    pub body: String,

    /// The user prompt sent to the inference API
    pub prompt_used: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Courses,

    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::LecturerId",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Profiles,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
