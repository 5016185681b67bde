use recipebot_core::Recipe;
use serde::{Deserialize, Serialize};

/// The whole persisted collection.
///
/// Top-level fields other than `recipes` are kept in `extra` so rewriting the
/// document never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeBook {
    /// Recipes in insertion order.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Fields this crate does not know about.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RecipeBook {
    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the collection holds no recipe.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Adds a recipe after the existing ones.
    pub fn push(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }
}
