pub mod assignment;
pub mod content;
pub mod course;
pub mod profile;
