use futures::future::BoxFuture;
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recipe::{Recipe, RecipeType};

pub mod memory;
mod postgres;

pub use self::postgres::*;

/// Persistence for recipes. Implementations own the physical layout and
/// the indexes behind each query.
pub trait RecipeRepository {
    /// Creates the backing collection and its indexes if they are missing.
    fn initialize(&self) -> BoxFuture<Result<(), BackendError>>;

    /// Inserts a new recipe and writes the generated ID back into it.
    fn create<'a>(&'a self, recipe: &'a mut Recipe) -> BoxFuture<'a, Result<(), BackendError>>;

    /// Returns `None` rather than an error when nothing matches.
    fn find_by_id(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>>;

    fn find_by_type(&self, recipe_type: RecipeType) -> BoxFuture<Result<Vec<Recipe>, BackendError>>;

    /// Case-insensitive substring match on ingredient names. The pattern
    /// is literal text.
    fn find_by_ingredient(&self, pattern: &str) -> BoxFuture<Result<Vec<Recipe>, BackendError>>;

    /// Replaces the stored document with the same ID. Last writer wins.
    fn update<'a>(&'a self, recipe: &'a Recipe) -> BoxFuture<'a, Result<(), BackendError>>;

    /// Removes a recipe. Removing a missing ID is not an error.
    fn delete(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>>;

    /// Full-text search over name, description and ingredient names,
    /// plus substring matches on ingredient names, best matches first.
    fn search(
        &self,
        query: &str,
        recipe_type: Option<RecipeType>,
    ) -> BoxFuture<Result<Vec<Recipe>, BackendError>>;
}

/// Escapes `%`, `_` and `\` so user text matches literally in `LIKE`.
pub(crate) fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());

    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}
