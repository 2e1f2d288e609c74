pub mod content_type;
pub mod role;

pub use content_type::ContentType;
pub use role::Role;
