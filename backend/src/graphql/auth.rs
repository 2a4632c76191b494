//! GraphQL request identity
//!
//! The HTTP layer verifies the bearer token and inserts an [`AuthUser`] into
//! the request data. Resolvers read it with [`AuthExt::viewer`] and hand it to
//! the service layer explicitly; they never decide authentication themselves.

use async_graphql::Context;

pub use crate::services::auth::AuthUser;

/// Extension trait to get the caller's identity from GraphQL context
pub trait AuthExt {
    /// The authenticated user, if the request carried a valid token
    fn viewer(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn viewer(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}
