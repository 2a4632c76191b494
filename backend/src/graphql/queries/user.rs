use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Look up a user by id or username
    ///
    /// No authentication required.
    async fn user(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        username: Option<String>,
    ) -> Result<User> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .user(id.as_ref().map(|id| id.as_str()), username.as_deref())
            .await
            .map(User::from)
            .map_err(|e| e.extend())
    }

    /// Get the current authenticated user with all saved books
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .me(ctx.viewer())
            .await
            .map(User::from)
            .map_err(|e| e.extend())
    }
}
