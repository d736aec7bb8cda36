//! Public shape of a recipe.
//!
//! Everything handed back to callers goes through [`project`], which copies
//! an explicit list of fields out of the stored record. Store bookkeeping
//! (`_id` naming, timestamps) stays behind.

use serde::{Deserialize, Serialize};

use crate::models::{Author, RecipeRecord};

/// Recipe as exposed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Hex form of the store identifier
    pub id: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub author: Author,
    /// Display order
    pub ingredients: Vec<String>,
    /// Execution order
    pub steps: Vec<String>,
    pub difficulty: i32,
    /// Minutes
    pub preparation_time: i32,
    /// Minutes
    pub cooking_time: i32,
}

/// Map a stored record to its public shape.
pub fn project(record: RecipeRecord) -> Recipe {
    // Destructure every field so a new record field has to be dealt with here.
    let RecipeRecord {
        id,
        category,
        name,
        description,
        author,
        ingredients,
        steps,
        difficulty,
        preparation_time,
        cooking_time,
        created_at: _,
        updated_at: _,
    } = record;

    let Author {
        pseudo,
        firstname,
        lastname,
    } = author;

    Recipe {
        id: id.to_hex(),
        category,
        name,
        description,
        author: Author {
            pseudo,
            firstname,
            lastname,
        },
        ingredients,
        steps,
        difficulty,
        preparation_time,
        cooking_time,
    }
}

/// Project every record, preserving order.
pub fn project_all(records: Vec<RecipeRecord>) -> Vec<Recipe> {
    records.into_iter().map(project).collect()
}
