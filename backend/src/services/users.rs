//! Account and saved-book operations
//!
//! Every operation takes the viewer explicitly as `Option<&AuthUser>` (the
//! identity the transport attached to the request, if any) and performs a
//! single store call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::{CreateUser, Database, SavedBookRecord, UserRecord};
use crate::db::sqlite_helpers::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::{AuthService, AuthUser};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r".+@.+\..+").expect("valid email regex"));

const LOGIN_REQUIRED: &str = "You need to be logged in!";

/// Registration input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input; either identifier may be given
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// A freshly signed token and the user it identifies
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Clone)]
pub struct UserService {
    db: Database,
    auth: AuthService,
}

impl UserService {
    pub fn new(db: Database, auth: AuthService) -> Self {
        Self { db, auth }
    }

    /// Public lookup by id or username. Identifiers are trimmed the same way
    /// registration trims them.
    pub async fn user(&self, id: Option<&str>, username: Option<&str>) -> ApiResult<UserRecord> {
        self.db
            .users()
            .find_by_id_or_username(id.map(str::trim), username.map(str::trim))
            .await?
            .ok_or_else(|| ApiError::not_found("Cannot find a user with this id or username!"))
    }

    /// The viewer's own record, with all saved books
    pub async fn me(&self, viewer: Option<&AuthUser>) -> ApiResult<UserRecord> {
        let viewer = require_viewer(viewer)?;
        self.db
            .users()
            .get_by_id(&viewer.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cannot find a user with this id!"))
    }

    /// Register a new account and sign a token for it
    pub async fn add_user(&self, input: NewUser) -> ApiResult<Session> {
        let input = validate_new_user(input)?;
        let password_hash = self.auth.hash_password(&input.password).await?;

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    tracing::debug!(error = %e, "Registration rejected: username or email taken");
                    ApiError::conflict("Something is wrong!")
                } else {
                    ApiError::Internal(e)
                }
            })?;

        let token = self.auth.sign_token(&user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(Session { token, user })
    }

    /// Check credentials and sign a token.
    ///
    /// Unknown identifier and wrong password are both `Unauthenticated` but keep
    /// distinct messages, which tells a caller whether the account exists.
    pub async fn login(&self, credentials: Credentials) -> ApiResult<Session> {
        let user = self
            .db
            .users()
            .find_by_username_or_email(
                credentials.username.as_deref().map(str::trim),
                credentials.email.as_deref().map(str::trim),
            )
            .await?;

        let Some(user) = user else {
            tracing::warn!(
                username = ?credentials.username,
                email = ?credentials.email,
                "Login failed: unknown user"
            );
            return Err(ApiError::unauthenticated("Cannot find this user"));
        };

        if !self
            .auth
            .verify_password(&credentials.password, &user.password_hash)
            .await?
        {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ApiError::unauthenticated("Wrong password!"));
        }

        let token = self.auth.sign_token(&user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(Session { token, user })
    }

    /// Add a book to the viewer's list; saving a known `book_id` again is a no-op
    pub async fn save_book(
        &self,
        viewer: Option<&AuthUser>,
        book: SavedBookRecord,
    ) -> ApiResult<UserRecord> {
        let viewer = require_viewer(viewer)?;
        let user = self
            .db
            .users()
            .add_saved_book(&viewer.user_id, &book)
            .await?
            .ok_or_else(|| ApiError::not_found("Cannot save book"))?;

        tracing::debug!(user_id = %user.id, book_id = %book.book_id, "Book saved");
        Ok(user)
    }

    /// Remove a book from the viewer's list; an unknown `book_id` is a no-op
    pub async fn delete_book(
        &self,
        viewer: Option<&AuthUser>,
        book_id: &str,
    ) -> ApiResult<UserRecord> {
        let viewer = require_viewer(viewer)?;
        let user = self
            .db
            .users()
            .remove_saved_book(&viewer.user_id, book_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Couldn't find user with this id!"))?;

        tracing::debug!(user_id = %user.id, book_id = %book_id, "Book removed");
        Ok(user)
    }
}

fn require_viewer(viewer: Option<&AuthUser>) -> ApiResult<&AuthUser> {
    viewer.ok_or_else(|| ApiError::unauthenticated(LOGIN_REQUIRED))
}

fn validate_new_user(input: NewUser) -> ApiResult<NewUser> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::invalid("Username is required"));
    }

    let email = input.email.trim().to_string();
    if !EMAIL_RE.is_match(&email) {
        return Err(ApiError::invalid("Must match an email address!"));
    }

    if input.password.is_empty() {
        return Err(ApiError::invalid("Password is required"));
    }

    Ok(NewUser {
        username,
        email,
        password: input.password,
    })
}
