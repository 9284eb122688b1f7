use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::CookbookError;

/// A single ingredient line of a recipe.
///
/// Ordering is by name first, so a sorted set of ingredients iterates in
/// alphabetical order. Two ingredients with the same name but different
/// amounts are distinct values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    /// Steps in the order they were written
    pub steps: Vec<String>,
    pub duration: String,
    pub group: String,
    pub number_of_portions: u32,
    pub ingredients: BTreeSet<Ingredient>,
}

impl Recipe {
    /// Check every invariant of a recipe, reporting the first violation.
    pub fn validate(&self) -> Result<(), CookbookError> {
        require_text("recipe name", &self.name)?;
        require_text("group", &self.group)?;
        require_text("duration", &self.duration)?;
        if self.steps.is_empty() {
            return Err(CookbookError::validation(
                "steps",
                format!("recipe '{}' has no steps", self.name),
            ));
        }
        if self.number_of_portions < 1 {
            return Err(CookbookError::validation(
                "number of portions",
                "must be at least 1",
            ));
        }
        if self.ingredients.is_empty() {
            return Err(CookbookError::validation(
                "ingredients",
                format!("recipe '{}' has no ingredients", self.name),
            ));
        }
        Ok(())
    }
}

/// The root aggregate: owns all recipes and, through them, all ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookbook {
    pub name: String,
    pub author: String,
    pub recipes: BTreeSet<Recipe>,
}

impl Cookbook {
    pub fn validate(&self) -> Result<(), CookbookError> {
        require_text("cookbook name", &self.name)?;
        require_text("author", &self.author)?;
        if self.recipes.is_empty() {
            return Err(CookbookError::validation(
                "recipes",
                "a cookbook needs at least one recipe",
            ));
        }
        self.recipes.iter().try_for_each(Recipe::validate)
    }

    /// Number of distinct groups across all recipes.
    pub fn group_count(&self) -> usize {
        group_by(&self.recipes).len()
    }
}

/// Partition recipes by their group name.
///
/// Groups iterate in ascending byte order of their name; the recipes of a
/// group keep the iteration order of the input.
pub fn group_by<'a, I>(recipes: I) -> BTreeMap<&'a str, Vec<&'a Recipe>>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut groups: BTreeMap<&str, Vec<&Recipe>> = BTreeMap::new();
    for recipe in recipes {
        groups.entry(recipe.group.as_str()).or_default().push(recipe);
    }
    groups
}

fn require_text(field: &str, value: &str) -> Result<(), CookbookError> {
    if value.trim().is_empty() {
        Err(CookbookError::validation(field, "must not be blank"))
    } else {
        Ok(())
    }
}
