use thiserror::Error;
use uuid::Uuid;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The recipe failed validation, or the request cannot describe
    /// a valid recipe.
    #[error("invalid recipe data")]
    InvalidRecipe,

    /// No recipe exists with the given ID.
    #[error("recipe not found")]
    RecipeNotFound(Uuid),

    /// Reserved for access control; nothing raises it yet.
    #[error("unauthorized")]
    Unauthorized,

    /// The path segment could not be parsed as a recipe ID.
    #[error("invalid ID")]
    InvalidId(String),

    /// The request body was not a valid recipe document.
    #[error("invalid request body: {source}")]
    MalformedBody { source: serde_json::Error },

    /// A required query parameter was absent or blank.
    #[error("{0} query is required")]
    MissingQuery(&'static str),

    /// A store call did not finish before its deadline.
    #[error("store call timed out")]
    StoreTimeout,

    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// A stored document could not be converted to or from JSON.
    #[error("document serialization error")]
    Serialization { source: serde_json::Error },
}

impl From<sqlx::Error> for BackendError {
    fn from(source: sqlx::Error) -> Self {
        BackendError::Sqlx { source }
    }
}

/// Enumerates errors encountered while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} is not a valid URL")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },

    #[error("unknown store {0:?} (expected `postgres` or `memory`)")]
    UnknownStore(String),
}
