//! GraphQL API
//!
//! The single API surface of the backend. Queries and mutations are defined per
//! domain under `queries/` and `mutations/` and merged into the roots in
//! `schema.rs`.

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthUser};
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};
