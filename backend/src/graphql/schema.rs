//! GraphQL schema definition
//!
//! `user`, `addUser` and `login` are open; `me`, `saveBook` and `deleteBook`
//! require an authenticated caller.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::services::UserService;

use super::mutations::{AuthMutations, UserMutations};
use super::queries::UserQueries;

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, UserMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(users: UserService) -> BookshelfSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(users)
        .finish()
}
