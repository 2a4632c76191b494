//! Application services

pub mod auth;
pub mod users;

pub use auth::{AuthConfig, AuthService, AuthUser};
pub use users::{Credentials, NewUser, Session, UserService};
