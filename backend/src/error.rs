//! API error kinds surfaced to GraphQL clients
//!
//! Each variant carries the human-readable message; [`ApiError::code`] is the
//! machine-readable kind placed in the GraphQL error's `extensions.code`.

use async_graphql::ErrorExtensions;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No authenticated viewer, or credentials did not check out
    #[error("{0}")]
    Unauthenticated(String),

    /// The addressed user does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule would be broken (username or email taken)
    #[error("{0}")]
    Conflict(String),

    /// Malformed input
    #[error("{0}")]
    Invalid(String),

    /// Store, hashing or signing failure. The detail is logged, never sent.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Machine-readable kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Invalid(_) => "BAD_USER_INPUT",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if let Self::Internal(e) = self {
            tracing::error!(error = ?e, "Request failed");
        }
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::unauthenticated("x").code(), "UNAUTHENTICATED");
        assert_eq!(ApiError::not_found("x").code(), "NOT_FOUND");
        assert_eq!(ApiError::conflict("x").code(), "CONFLICT");
        assert_eq!(ApiError::invalid("x").code(), "BAD_USER_INPUT");
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).code(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_message_is_kept_and_internal_detail_hidden() {
        assert_eq!(ApiError::unauthenticated("Wrong password!").to_string(), "Wrong password!");
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).to_string(),
            "Internal server error"
        );
    }

    #[test]
    fn test_graphql_error_carries_code() {
        let err = ApiError::not_found("Cannot save book").extend();
        assert_eq!(err.message, "Cannot save book");

        let json = serde_json::to_value(err.extensions.unwrap()).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }
}
