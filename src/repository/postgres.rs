use std::str::FromStr;

use futures::future::BoxFuture;
use futures::FutureExt;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Executor;
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recipe::{Recipe, RecipeType};

type RecipeRow = (Uuid, Json<Recipe>);

/// Stores each recipe as a JSONB document keyed by a generated UUID.
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        PgRecipeRepository { pool }
    }
}

/// Opens a pool against `database`, overriding any database named in
/// `connection_string`.
pub async fn connect(
    connection_string: &str,
    database: &str,
    max_connections: u32,
) -> Result<PgPool, BackendError> {
    let options = PgConnectOptions::from_str(connection_string)?.database(database);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

// these can be simplified once async functions in traits are stabilized
impl super::RecipeRepository for PgRecipeRepository {
    fn initialize(&self) -> BoxFuture<Result<(), BackendError>> {
        async move {
            self.pool
                .execute(include_str!("queries/initialize.sql"))
                .await?;

            Ok(())
        }
        .boxed()
    }

    fn create<'a>(&'a self, recipe: &'a mut Recipe) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            let document = to_document(recipe)?;

            let (id,): (Uuid,) = sqlx::query_as(include_str!("queries/create.sql"))
                .bind(document)
                .fetch_one(&self.pool)
                .await?;

            recipe.id = Some(id);

            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
        let id = *id;

        async move {
            let row: Option<RecipeRow> = sqlx::query_as(include_str!("queries/find_by_id.sql"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            Ok(row.map(into_recipe))
        }
        .boxed()
    }

    fn find_by_type(&self, recipe_type: RecipeType) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        async move {
            let rows: Vec<RecipeRow> = sqlx::query_as(include_str!("queries/find_by_type.sql"))
                .bind(recipe_type.as_str())
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(into_recipe).collect())
        }
        .boxed()
    }

    fn find_by_ingredient(&self, pattern: &str) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        let pattern = super::escape_like(pattern);

        async move {
            let rows: Vec<RecipeRow> =
                sqlx::query_as(include_str!("queries/find_by_ingredient.sql"))
                    .bind(pattern)
                    .fetch_all(&self.pool)
                    .await?;

            Ok(rows.into_iter().map(into_recipe).collect())
        }
        .boxed()
    }

    fn update<'a>(&'a self, recipe: &'a Recipe) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            let id = recipe.id.ok_or(BackendError::InvalidRecipe)?;
            let document = to_document(recipe)?;

            sqlx::query(include_str!("queries/update.sql"))
                .bind(id)
                .bind(document)
                .execute(&self.pool)
                .await?;

            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>> {
        let id = *id;

        async move {
            sqlx::query(include_str!("queries/delete.sql"))
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(())
        }
        .boxed()
    }

    fn search(
        &self,
        query: &str,
        recipe_type: Option<RecipeType>,
    ) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
        let terms = query.to_owned();
        let pattern = super::escape_like(query);

        async move {
            let rows: Vec<RecipeRow> = sqlx::query_as(include_str!("queries/search.sql"))
                .bind(terms)
                .bind(pattern)
                .bind(recipe_type.map(|t| t.as_str()))
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(into_recipe).collect())
        }
        .boxed()
    }
}

fn into_recipe((id, Json(mut recipe)): RecipeRow) -> Recipe {
    recipe.id = Some(id);
    recipe
}

/// Serializes everything but the ID, which lives in its own column.
fn to_document(recipe: &Recipe) -> Result<serde_json::Value, BackendError> {
    let mut document =
        serde_json::to_value(recipe).map_err(|source| BackendError::Serialization { source })?;

    if let Some(object) = document.as_object_mut() {
        object.remove("id");
    }

    Ok(document)
}
