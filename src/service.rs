use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, Logger};
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recipe::{Recipe, RecipeDraft, RecipeType};
use crate::repository::RecipeRepository;

pub type SafeRepository = dyn RecipeRepository + Send + Sync;

/// Business rules for recipes. The only caller of the repository.
///
/// Every store call is bounded by `store_timeout`; dropping a returned
/// future (for instance when the client disconnects) abandons the call.
pub struct RecipeService {
    logger: Arc<Logger>,
    repository: Arc<SafeRepository>,
    store_timeout: Duration,
}

impl RecipeService {
    pub fn new(logger: Arc<Logger>, repository: Arc<SafeRepository>, store_timeout: Duration) -> Self {
        Self {
            logger,
            repository,
            store_timeout,
        }
    }

    /// Validates and stores a new cocktail.
    pub async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe, BackendError> {
        let mut recipe = Recipe::new(RecipeType::Cocktail, draft);

        if !recipe.validate() {
            return Err(BackendError::InvalidRecipe);
        }

        self.bounded(self.repository.create(&mut recipe)).await?;
        debug!(self.logger, "Created recipe"; "id" => ?recipe.id);

        Ok(recipe)
    }

    pub async fn get_recipe_by_id(&self, id: &Uuid) -> Result<Recipe, BackendError> {
        self.bounded(self.repository.find_by_id(id))
            .await?
            .ok_or(BackendError::RecipeNotFound(*id))
    }

    pub async fn get_cocktail_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        self.bounded(self.repository.find_by_type(RecipeType::Cocktail))
            .await
    }

    /// Replaces the editable fields of an existing recipe.
    pub async fn update_recipe(&self, id: &Uuid, draft: RecipeDraft) -> Result<Recipe, BackendError> {
        let mut recipe = self.get_recipe_by_id(id).await?;

        recipe.update(draft);

        if !recipe.validate() {
            return Err(BackendError::InvalidRecipe);
        }

        self.bounded(self.repository.update(&recipe)).await?;
        debug!(self.logger, "Updated recipe"; "id" => %id);

        Ok(recipe)
    }

    pub async fn delete_recipe(&self, id: &Uuid) -> Result<(), BackendError> {
        self.get_recipe_by_id(id).await?;
        self.bounded(self.repository.delete(id)).await?;
        debug!(self.logger, "Deleted recipe"; "id" => %id);

        Ok(())
    }

    pub async fn search_recipes(
        &self,
        query: &str,
        cocktails_only: bool,
    ) -> Result<Vec<Recipe>, BackendError> {
        let recipe_type = if cocktails_only {
            Some(RecipeType::Cocktail)
        } else {
            None
        };

        self.bounded(self.repository.search(query, recipe_type))
            .await
    }

    pub async fn find_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>, BackendError> {
        if ingredient.is_empty() {
            return Err(BackendError::InvalidRecipe);
        }

        self.bounded(self.repository.find_by_ingredient(ingredient))
            .await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| BackendError::StoreTimeout)?
    }
}
