use std::env;

use uuid::Uuid;

use shaker::recipe::{Ingredient, Recipe, RecipeDraft, RecipeType};
use shaker::repository::{connect, PgRecipeRepository, RecipeRepository};

/// Runs only when a scratch database is available, e.g.
/// `SHAKER_TEST_DB_CONNECTION_STRING=postgres://postgres@localhost:5432`.
#[tokio::test]
async fn postgres_repository_works() {
    dotenv::dotenv().ok();

    let connection_string = match env::var("SHAKER_TEST_DB_CONNECTION_STRING") {
        Ok(s) if !s.trim().is_empty() => s,
        _ => {
            eprintln!("SHAKER_TEST_DB_CONNECTION_STRING not set; skipping");
            return;
        }
    };
    let database = env::var("SHAKER_TEST_DB_NAME").unwrap_or_else(|_| "postgres".to_owned());

    let pool = connect(&connection_string, &database, 2)
        .await
        .expect("connect to test database");
    let repository = PgRecipeRepository::new(pool.clone());

    repository.initialize().await.expect("initialize schema");
    // idempotent
    repository.initialize().await.expect("initialize schema again");

    test_round_trip(&repository).await;
    test_update_and_delete(&repository).await;
    test_lookups(&repository).await;

    pool.close().await;
}

async fn test_round_trip(repository: &PgRecipeRepository) {
    let mut recipe = Recipe::new(RecipeType::Cocktail, draft(&marker(), "Tequila"));
    repository.create(&mut recipe).await.expect("create recipe");

    let id = recipe.id.expect("ID assigned on create");
    let stored = repository
        .find_by_id(&id)
        .await
        .expect("find recipe")
        .expect("recipe exists");

    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.draft(), recipe.draft());
    assert_eq!(stored.created_at(), recipe.created_at());

    let cocktails = repository
        .find_by_type(RecipeType::Cocktail)
        .await
        .expect("list cocktails");
    assert!(cocktails.iter().any(|r| r.id == Some(id)));

    assert_eq!(
        repository
            .find_by_id(&Uuid::new_v4())
            .await
            .expect("find missing recipe"),
        None
    );
}

async fn test_update_and_delete(repository: &PgRecipeRepository) {
    let mut recipe = Recipe::new(RecipeType::Cocktail, draft(&marker(), "Gin"));
    repository.create(&mut recipe).await.expect("create recipe");
    let id = recipe.id.expect("ID assigned on create");

    let mut changed = recipe.draft().clone();
    changed.garnish = Some("Olive".to_owned());
    recipe.update(changed);
    repository.update(&recipe).await.expect("update recipe");

    let stored = repository
        .find_by_id(&id)
        .await
        .expect("find recipe")
        .expect("recipe exists");
    assert_eq!(stored.garnish(), Some("Olive"));
    assert_eq!(stored.updated_at(), recipe.updated_at());

    repository.delete(&id).await.expect("delete recipe");
    repository.delete(&id).await.expect("delete recipe twice");

    assert_eq!(repository.find_by_id(&id).await.expect("find recipe"), None);
}

async fn test_lookups(repository: &PgRecipeRepository) {
    let name = marker();
    let ingredient = format!("Bitters {}", Uuid::new_v4().to_simple());

    let mut cocktail = Recipe::new(RecipeType::Cocktail, draft(&name, &ingredient));
    let mut food = Recipe::new(RecipeType::Food, draft(&name, "Flour"));
    repository.create(&mut cocktail).await.expect("create cocktail");
    repository.create(&mut food).await.expect("create food");

    let by_ingredient = repository
        .find_by_ingredient(&ingredient.to_uppercase())
        .await
        .expect("find by ingredient");
    assert_eq!(
        by_ingredient.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![cocktail.id]
    );

    // `%` is literal, not a wildcard
    let wildcard = repository
        .find_by_ingredient("Bitters %")
        .await
        .expect("find by ingredient");
    assert!(wildcard.is_empty());

    let found = repository.search(&name, None).await.expect("search");
    assert_eq!(found.len(), 2);

    let found = repository
        .search(&name, Some(RecipeType::Cocktail))
        .await
        .expect("search cocktails");
    assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![cocktail.id]);

    let other = marker();
    let mut gimlet = Recipe::new(RecipeType::Cocktail, draft(&other, "Gin"));
    repository.create(&mut gimlet).await.expect("create gimlet");

    // words are alternatives, not all required
    let found = repository
        .search(&format!("{} {}", name, other), Some(RecipeType::Cocktail))
        .await
        .expect("search either word");
    let mut ids = found.iter().map(|r| r.id).collect::<Vec<_>>();
    ids.sort();
    let mut expected = vec![cocktail.id, gimlet.id];
    expected.sort();
    assert_eq!(ids, expected);

    for recipe in &[cocktail, food, gimlet] {
        repository
            .delete(&recipe.id.expect("ID assigned on create"))
            .await
            .expect("clean up");
    }
}

/// A one-word name no other test run will produce.
fn marker() -> String {
    format!("m{}", Uuid::new_v4().to_simple())
}

fn draft(name: &str, ingredient: &str) -> RecipeDraft {
    RecipeDraft {
        name: name.to_owned(),
        ingredients: vec![Ingredient {
            name: ingredient.to_owned(),
            amount: 1.5,
            unit: "oz".to_owned(),
            ..Default::default()
        }],
        instructions: vec!["Stir".to_owned()],
        ..Default::default()
    }
}
