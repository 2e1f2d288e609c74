pub mod auth_service;
pub mod auth_service_impl;
pub mod generation;
pub mod prompts;

pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::StoreAuthService;
pub use generation::{GenerationError, GenerationRequest, GenerationService};
