use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The kind of recipe. Only cocktails can currently be created; `Food`
/// exists in stored data and the type filter but no route produces it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    Cocktail,
    Food,
}

impl RecipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Cocktail => "cocktail",
            RecipeType::Food => "food",
        }
    }
}

/// A single ingredient line in a recipe.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Ingredient {
    pub name: String,

    /// The quantity, in `unit`s. Fractions are allowed; `null` reads as 0.
    #[serde(deserialize_with = "null_as_zero")]
    pub amount: f64,

    pub unit: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub is_optional: bool,
}

impl Ingredient {
    /// Whether this line fully specifies something to pour.
    fn is_measured(&self) -> bool {
        !self.name.is_empty() && self.amount > 0.0 && !self.unit.is_empty()
    }
}

/// The user-editable fields of a recipe, as submitted for creation or
/// replacement.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub glass: Option<String>,
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub garnish: Option<String>,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// A recipe as stored and returned to clients.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Recipe {
    /// Assigned by the repository on first insert.
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(rename = "type")]
    recipe_type: RecipeType,

    #[serde(flatten)]
    draft: RecipeDraft,

    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Recipe {
    /// Creates an unsaved recipe. Validation is a separate step.
    pub fn new(recipe_type: RecipeType, draft: RecipeDraft) -> Self {
        let now = OffsetDateTime::now_utc();

        Recipe {
            id: None,
            recipe_type,
            draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field. The type and ID never change.
    pub fn update(&mut self, draft: RecipeDraft) {
        self.draft = draft;
        self.touch();
    }

    /// Checks the recipe is complete enough to store.
    pub fn validate(&self) -> bool {
        let draft = &self.draft;

        if draft.name.is_empty() || draft.ingredients.is_empty() || draft.instructions.is_empty() {
            return false;
        }

        match self.recipe_type {
            RecipeType::Cocktail => draft.ingredients.iter().any(Ingredient::is_measured),
            RecipeType::Food => true,
        }
    }

    pub fn recipe_type(&self) -> RecipeType {
        self.recipe_type
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn description(&self) -> &str {
        &self.draft.description
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.draft.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.draft.instructions
    }

    pub fn glass(&self) -> Option<&str> {
        self.draft.glass.as_deref()
    }

    pub fn garnish(&self) -> Option<&str> {
        self.draft.garnish.as_deref()
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    // the wall clock may step backwards; the stored order must not
    fn touch(&mut self) {
        let now = OffsetDateTime::now_utc();

        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}
