pub use super::course_assignments::Entity as CourseAssignments;
pub use super::courses::Entity as Courses;
pub use super::generated_content::Entity as GeneratedContent;
pub use super::profiles::Entity as Profiles;
