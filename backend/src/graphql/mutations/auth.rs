//! GraphQL authentication mutations
//!
//! Registration and login. Neither requires an authenticated caller; both
//! return a freshly signed token together with the user.

use super::prelude::*;
use crate::services::{Credentials, NewUser};

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user account
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<Auth> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .add_user(NewUser {
                username,
                email,
                password,
            })
            .await
            .map(Auth::from)
            .map_err(|e| e.extend())
    }

    /// Authenticate with username or email and password
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: Option<String>,
        email: Option<String>,
        password: String,
    ) -> Result<Auth> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .login(Credentials {
                username,
                email,
                password,
            })
            .await
            .map(Auth::from)
            .map_err(|e| e.extend())
    }
}
