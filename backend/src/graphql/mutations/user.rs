use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Add a book to the current user's saved list
    ///
    /// Requires authentication. Saving a book that is already in the list
    /// leaves the list unchanged.
    async fn save_book(&self, ctx: &Context<'_>, book_data: BookInput) -> Result<User> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .save_book(ctx.viewer(), book_data.into())
            .await
            .map(User::from)
            .map_err(|e| e.extend())
    }

    /// Remove a book from the current user's saved list
    ///
    /// Requires authentication. Removing a book that is not in the list is a no-op.
    async fn delete_book(&self, ctx: &Context<'_>, book_id: String) -> Result<User> {
        let users = ctx.data_unchecked::<UserService>();
        users
            .delete_book(ctx.viewer(), &book_id)
            .await
            .map(User::from)
            .map_err(|e| e.extend())
    }
}
