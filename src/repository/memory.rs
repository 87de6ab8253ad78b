use std::collections::HashSet;

use futures::future::BoxFuture;
use futures::lock::Mutex;
use futures::FutureExt;
use rust_stemmers::{Algorithm, Stemmer};
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recipe::{Recipe, RecipeType};

/// Keeps recipes in insertion order in process memory. Used for local
/// development and tests; nothing survives a restart.
#[derive(Default)]
pub struct MemoryRepository {
    recipes: Mutex<Vec<Recipe>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Default::default()
    }
}

impl super::RecipeRepository for MemoryRepository {
    fn initialize(&self) -> BoxFuture<Result<(), BackendError>> {
        async { Ok(()) }.boxed()
    }

    fn create<'a>(&'a self, recipe: &'a mut Recipe) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            let mut recipes = self.recipes.lock().await;
            let mut stored = recipe.clone();
            let id = Uuid::new_v4();

            stored.id = Some(id);
            recipes.push(stored);
            recipe.id = Some(id);

            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
        let id = *id;

        async move {
            let recipes = self.recipes.lock().await;

            Ok(recipes.iter().find(|r| r.id == Some(id)).cloned())
        }
        .boxed()
    }

    fn find_by_type(&self, recipe_type: RecipeType) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        async move {
            let recipes = self.recipes.lock().await;

            Ok(recipes
                .iter()
                .filter(|r| r.recipe_type() == recipe_type)
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn find_by_ingredient(&self, pattern: &str) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        let needle = pattern.to_lowercase();

        async move {
            let recipes = self.recipes.lock().await;

            Ok(recipes
                .iter()
                .filter(|r| has_ingredient_like(r, &needle))
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn update<'a>(&'a self, recipe: &'a Recipe) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            let id = recipe.id.ok_or(BackendError::InvalidRecipe)?;
            let mut recipes = self.recipes.lock().await;

            // an unknown ID is a no-op
            if let Some(stored) = recipes.iter_mut().find(|r| r.id == Some(id)) {
                *stored = recipe.clone();
            }

            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>> {
        let id = *id;

        async move {
            self.recipes.lock().await.retain(|r| r.id != Some(id));

            Ok(())
        }
        .boxed()
    }

    fn search(
        &self,
        query: &str,
        recipe_type: Option<RecipeType>,
    ) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        let terms = words(query);
        let needle = query.to_lowercase();

        async move {
            let recipes = self.recipes.lock().await;

            let mut scored = recipes
                .iter()
                .filter(|r| recipe_type.map_or(true, |t| r.recipe_type() == t))
                .filter_map(|r| {
                    let score = text_score(r, &terms);

                    if score > 0 || has_ingredient_like(r, &needle) {
                        Some((score, r.clone()))
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>();

            // stable, so equal scores keep insertion order
            scored.sort_by(|(a, _), (b, _)| b.cmp(a));

            Ok(scored.into_iter().map(|(_, r)| r).collect())
        }
        .boxed()
    }
}

fn has_ingredient_like(recipe: &Recipe, needle: &str) -> bool {
    recipe
        .ingredients()
        .iter()
        .any(|i| i.name.to_lowercase().contains(needle))
}

/// Counts query words found among the indexed words of a recipe.
fn text_score(recipe: &Recipe, terms: &HashSet<String>) -> usize {
    let mut indexed = words(recipe.name());
    indexed.extend(words(recipe.description()));

    for ingredient in recipe.ingredients() {
        indexed.extend(words(&ingredient.name));
    }

    terms.iter().filter(|t| indexed.contains(*t)).count()
}

/// Lowercased English stems, so `sours` and `sour` index the same way.
fn words(text: &str) -> HashSet<String> {
    let stemmer = Stemmer::create(Algorithm::English);

    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| stemmer.stem(&w.to_lowercase()).into_owned())
        .collect()
}
