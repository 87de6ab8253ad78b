use serde::Deserialize;

/// Parameters for `GET /api/recipes/search`. Both are optional at the
/// parsing stage so a missing `q` can be reported like any other error.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub cocktails_only: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    pub q: Option<String>,
}
