//! Users repository
//!
//! Handles user accounts and each user's saved book list. Saved books are
//! keyed by `(user_id, book_id)`, so adding is add-if-absent and removing is
//! remove-by-key.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub saved_books: Vec<SavedBookRecord>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBookRecord {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn into_record(self, saved_books: Vec<SavedBookRecord>) -> UserRecord {
        UserRecord {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            saved_books,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct SavedBookRow {
    book_id: String,
    title: String,
    authors: String,
    description: Option<String>,
    image: Option<String>,
    link: Option<String>,
}

impl From<SavedBookRow> for SavedBookRecord {
    fn from(r: SavedBookRow) -> Self {
        Self {
            book_id: r.book_id,
            title: r.title,
            authors: json_to_vec(&r.authors),
            description: r.description,
            image: r.image,
            link: r.link,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. Fails with a UNIQUE constraint error on a taken
    /// username or email.
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create user"))
    }

    /// Get user by ID, with saved books
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        load_user(&mut *conn, id).await
    }

    /// Get the first user whose id OR username matches. `None` arguments match nothing.
    pub async fn find_by_id_or_username(
        &self,
        id: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ? OR username = ? ORDER BY rowid LIMIT 1"
        ))
        .bind(id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        self.with_books(row).await
    }

    /// Get the first user whose username OR email matches. `None` arguments match nothing.
    pub async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? OR email = ? ORDER BY rowid LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.with_books(row).await
    }

    /// Count all users
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ========================================================================
    // Saved books
    // ========================================================================

    /// Add a book to the user's list unless that `book_id` is already there.
    ///
    /// Returns the updated user, or `None` if the user does not exist.
    ///
    /// The first statement of each transaction is the write, so the lock is
    /// taken as a writer up front and concurrent requests queue on the busy
    /// timeout instead of failing a read-to-write lock upgrade.
    pub async fn add_saved_book(
        &self,
        user_id: &str,
        book: &SavedBookRecord,
    ) -> Result<Option<UserRecord>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO saved_books
                (user_id, book_id, title, authors, description, image, link, saved_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM users WHERE id = ?)
            "#,
        )
        .bind(user_id)
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(vec_to_json(&book.authors))
        .bind(&book.description)
        .bind(&book.image)
        .bind(&book.link)
        .bind(now_iso8601())
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            touch_user(&mut *tx, user_id).await?;
        }

        let user = load_user(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Remove the entry with `book_id` from the user's list, if present.
    ///
    /// Returns the updated user, or `None` if the user does not exist.
    pub async fn remove_saved_book(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> Result<Option<UserRecord>> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM saved_books WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            touch_user(&mut *tx, user_id).await?;
        }

        let user = load_user(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn with_books(&self, row: Option<UserRow>) -> Result<Option<UserRecord>> {
        match row {
            Some(row) => {
                let mut conn = self.pool.acquire().await?;
                let books = saved_books(&mut *conn, &row.id).await?;
                Ok(Some(row.into_record(books)))
            }
            None => Ok(None),
        }
    }
}

// Connection-level helpers so the same reads work inside a transaction.

async fn touch_user(conn: &mut SqliteConnection, user_id: &str) -> Result<()> {
    sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
        .bind(now_iso8601())
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn load_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let books = saved_books(conn, &row.id).await?;
            Ok(Some(row.into_record(books)))
        }
        None => Ok(None),
    }
}

async fn saved_books(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<SavedBookRecord>> {
    let rows = sqlx::query_as::<_, SavedBookRow>(
        r#"
        SELECT book_id, title, authors, description, image, link
        FROM saved_books
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(SavedBookRecord::from).collect())
}
