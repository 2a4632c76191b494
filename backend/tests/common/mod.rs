//! Shared setup for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Variables};
use bookshelf::config::Config;
use bookshelf::db::Database;
use bookshelf::graphql::{AuthUser, BookshelfSchema, build_schema};
use bookshelf::services::{AuthConfig, AuthService, UserService};
use serde_json::Value;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: TEST_SECRET.to_string(),
        jwt_secret_generated: false,
        token_lifetime_secs: 3600,
        // Lowest cost bcrypt accepts; keeps the suite fast
        bcrypt_cost: 4,
    }
}

pub fn test_auth() -> AuthService {
    AuthService::new(AuthConfig::from_config(&test_config()))
}

pub async fn test_schema() -> BookshelfSchema {
    let db = Database::in_memory().await.unwrap();
    build_schema(UserService::new(db, test_auth()))
}

pub async fn test_state() -> bookshelf::AppState {
    let db = Database::in_memory().await.unwrap();
    bookshelf::AppState::new(Arc::new(test_config()), db)
}

/// Execute a GraphQL document and return the JSON response body
pub async fn exec(
    schema: &BookshelfSchema,
    query: &str,
    variables: Value,
    viewer: Option<AuthUser>,
) -> Value {
    let mut request = Request::new(query).variables(Variables::from_json(variables));
    if let Some(viewer) = viewer {
        request = request.data(viewer);
    }
    serde_json::to_value(schema.execute(request).await).unwrap()
}

/// The `extensions.code` of the first error, if any
pub fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

/// The message of the first error, if any
pub fn error_message(response: &Value) -> Option<&str> {
    response["errors"][0]["message"].as_str()
}

pub const ADD_USER: &str = r#"
    mutation AddUser($username: String!, $email: String!, $password: String!) {
        addUser(username: $username, email: $email, password: $password) {
            token
            user { _id username email bookCount savedBooks { bookId title } }
        }
    }
"#;

pub const LOGIN: &str = r#"
    mutation Login($username: String, $email: String, $password: String!) {
        login(username: $username, email: $email, password: $password) {
            token
            user { _id username }
        }
    }
"#;

pub const ME: &str = r#"
    query { me { _id username email bookCount savedBooks { bookId title authors description image link } } }
"#;

pub const SAVE_BOOK: &str = r#"
    mutation SaveBook($book: BookInput!) {
        saveBook(bookData: $book) { _id bookCount savedBooks { bookId title } }
    }
"#;

pub const DELETE_BOOK: &str = r#"
    mutation DeleteBook($bookId: String!) {
        deleteBook(bookId: $bookId) { _id bookCount savedBooks { bookId title } }
    }
"#;

/// Register a user and return the issued token and the viewer identity
pub async fn register(
    schema: &BookshelfSchema,
    username: &str,
    email: &str,
    password: &str,
) -> (String, AuthUser) {
    let response = exec(
        schema,
        ADD_USER,
        serde_json::json!({ "username": username, "email": email, "password": password }),
        None,
    )
    .await;
    assert!(response.get("errors").is_none(), "addUser failed: {}", response);

    let token = response["data"]["addUser"]["token"].as_str().unwrap().to_string();
    let viewer = test_auth().verify_token(&token).unwrap();
    (token, viewer)
}
