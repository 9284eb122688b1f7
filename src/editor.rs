//! Form-shaped drafts and the session that turns them into a [`Cookbook`].
//!
//! Drafts hold text exactly as entered. Nothing is checked until
//! [`EditorSession::build`], which either yields a cookbook satisfying every
//! model invariant or a validation error.

use log::debug;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::CookbookError;
use crate::model::{Cookbook, Ingredient, Recipe};

/// Identity of a draft within one [`EditorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftId(u64);

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A recipe as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub group: String,
    pub duration: String,
    pub portions: String,
    /// One step per line; blank lines are ignored
    pub steps: String,
    pub ingredients: Vec<IngredientDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientDraft {
    pub name: String,
    pub amount: String,
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        RecipeDraft {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_recipe(recipe: &Recipe) -> Self {
        RecipeDraft {
            name: recipe.name.clone(),
            group: recipe.group.clone(),
            duration: recipe.duration.clone(),
            portions: recipe.number_of_portions.to_string(),
            steps: recipe
                .steps
                .iter()
                .map(|step| format!("{step}\n"))
                .collect(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| IngredientDraft {
                    name: i.name.clone(),
                    amount: i.amount.clone(),
                })
                .collect(),
        }
    }

    pub fn add_ingredient(&mut self, name: impl Into<String>, amount: impl Into<String>) {
        self.ingredients.push(IngredientDraft {
            name: name.into(),
            amount: amount.into(),
        });
    }

    /// Non-blank lines of the steps text, in order.
    pub fn step_lines(&self) -> Vec<String> {
        self.steps
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Convert the draft into a validated recipe.
    pub fn to_recipe(&self) -> Result<Recipe, CookbookError> {
        let portions = self.portions.trim();
        let number_of_portions = portions.parse::<u32>().map_err(|_| {
            CookbookError::validation(
                "number of portions",
                format!("'{}' is not a whole number", self.portions),
            )
        })?;

        let mut ingredients = BTreeSet::new();
        for draft in &self.ingredients {
            if draft.name.trim().is_empty() || draft.amount.trim().is_empty() {
                return Err(CookbookError::validation(
                    "ingredient",
                    format!("recipe '{}' has an incomplete ingredient", self.name),
                ));
            }
            ingredients.insert(Ingredient::new(draft.name.clone(), draft.amount.clone()));
        }

        let recipe = Recipe {
            name: self.name.clone(),
            steps: self.step_lines(),
            duration: self.duration.clone(),
            group: self.group.clone(),
            number_of_portions,
            ingredients,
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

/// The drafts of one editing session.
///
/// Ids come from a counter owned by the session, so two sessions never share
/// state and an id is never reused within a session.
#[derive(Debug, Default)]
pub struct EditorSession {
    pub name: String,
    pub author: String,
    next_id: u64,
    recipes: Vec<(DraftId, RecipeDraft)>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session on an existing cookbook, recipes ordered by name.
    pub fn from_cookbook(cookbook: &Cookbook) -> Self {
        let mut session = EditorSession {
            name: cookbook.name.clone(),
            author: cookbook.author.clone(),
            ..Default::default()
        };
        let mut recipes: Vec<&Recipe> = cookbook.recipes.iter().collect();
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        for recipe in recipes {
            session.insert(RecipeDraft::from_recipe(recipe));
        }
        session
    }

    /// Add an empty draft with the given name.
    pub fn add_recipe(&mut self, name: impl Into<String>) -> DraftId {
        self.insert(RecipeDraft::new(name))
    }

    pub fn insert(&mut self, draft: RecipeDraft) -> DraftId {
        let id = DraftId(self.next_id);
        self.next_id += 1;
        debug!("Adding recipe draft {} '{}'", id, draft.name);
        self.recipes.push((id, draft));
        id
    }

    pub fn recipe(&self, id: DraftId) -> Option<&RecipeDraft> {
        self.recipes
            .iter()
            .find(|(draft_id, _)| *draft_id == id)
            .map(|(_, draft)| draft)
    }

    pub fn recipe_mut(&mut self, id: DraftId) -> Option<&mut RecipeDraft> {
        self.recipes
            .iter_mut()
            .find(|(draft_id, _)| *draft_id == id)
            .map(|(_, draft)| draft)
    }

    pub fn remove_recipe(&mut self, id: DraftId) -> Option<RecipeDraft> {
        let index = self.recipes.iter().position(|(draft_id, _)| *draft_id == id)?;
        Some(self.recipes.remove(index).1)
    }

    /// Drafts ordered by name, then by id for drafts sharing a name.
    pub fn drafts(&self) -> impl Iterator<Item = (DraftId, &RecipeDraft)> {
        let mut drafts: Vec<(DraftId, &RecipeDraft)> =
            self.recipes.iter().map(|(id, draft)| (*id, draft)).collect();
        drafts.sort_by(|(a_id, a), (b_id, b)| a.name.cmp(&b.name).then(a_id.cmp(b_id)));
        drafts.into_iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Snapshot the session as a validated cookbook.
    pub fn build(&self) -> Result<Cookbook, CookbookError> {
        let recipes = self
            .recipes
            .iter()
            .map(|(_, draft)| draft.to_recipe())
            .collect::<Result<BTreeSet<Recipe>, CookbookError>>()?;
        let cookbook = Cookbook {
            name: self.name.clone(),
            author: self.author.clone(),
            recipes,
        };
        cookbook.validate()?;
        Ok(cookbook)
    }
}
