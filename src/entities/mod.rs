pub mod prelude;

pub mod course_assignments;
pub mod courses;
pub mod generated_content;
pub mod profiles;
