//! GraphQL object and input types

use async_graphql::{ID, InputObject, SimpleObject};

use crate::db::{SavedBookRecord, UserRecord};
use crate::services::Session;

/// A registered user and their saved books
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: String,
    pub email: String,
    /// Number of saved books
    pub book_count: i32,
    pub saved_books: Vec<Book>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        let saved_books: Vec<Book> = r.saved_books.into_iter().map(Book::from).collect();
        Self {
            id: ID(r.id),
            username: r.username,
            email: r.email,
            book_count: i32::try_from(saved_books.len()).unwrap_or(i32::MAX),
            saved_books,
        }
    }
}

/// A book reference saved by a user, stored as the client supplied it
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    /// External catalog identifier
    pub book_id: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub title: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Info page URL
    pub link: Option<String>,
}

impl From<SavedBookRecord> for Book {
    fn from(r: SavedBookRecord) -> Self {
        Self {
            book_id: r.book_id,
            authors: r.authors,
            description: r.description,
            title: r.title,
            image: r.image,
            link: r.link,
        }
    }
}

/// Signed token plus the user it identifies
#[derive(Debug, Clone, SimpleObject)]
pub struct Auth {
    pub token: String,
    pub user: User,
}

impl From<Session> for Auth {
    fn from(s: Session) -> Self {
        Self {
            token: s.token,
            user: s.user.into(),
        }
    }
}

/// Book data sent by the client on save
#[derive(Debug, Clone, InputObject)]
pub struct BookInput {
    pub book_id: String,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub title: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl From<BookInput> for SavedBookRecord {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            title: input.title,
            authors: input.authors.unwrap_or_default(),
            description: input.description,
            image: input.image,
            link: input.link,
        }
    }
}
