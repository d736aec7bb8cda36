use chrono::{DateTime, Utc};
use mongodb::bson::oid::{self, ObjectId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Lowest accepted difficulty.
pub const DIFFICULTY_MIN: i32 = 0;

/// Highest accepted difficulty. The documented scale stops at 5 but stored
/// recipes already go up to 8, so the bound leaves headroom.
pub const DIFFICULTY_MAX: i32 = 10;

/// Text fields are stored trimmed, so whitespace-only input counts as empty
pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Every entry of an ingredient or step list must carry text
pub(crate) fn validate_non_empty_items(items: &[String]) -> Result<(), validator::ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(validator::ValidationError::new("empty_item"));
    }
    Ok(())
}

/// Accepts integers and integral doubles; the mongo shell stores numbers as doubles.
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(value) => i32::try_from(value).map_err(D::Error::custom),
        Number::Float(value)
            if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 =>
        {
            Ok(value as i32)
        }
        Number::Float(value) => Err(D::Error::custom(format!(
            "expected a whole number, got {value}"
        ))),
    }
}

fn trim_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|item| item.trim().to_string()).collect()
}

/// Store-assigned recipe identifier (a MongoDB ObjectId)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(ObjectId);

impl RecipeId {
    /// Mint a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecipeId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl FromStr for RecipeId {
    type Err = oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// Recipe author, embedded in every recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Author {
    /// Public handle; part of the recipe uniqueness key
    #[validate(custom(function = "validate_not_blank"))]
    pub pseudo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub lastname: Option<String>,
}

impl Author {
    pub fn new(pseudo: impl Into<String>) -> Self {
        Self {
            pseudo: pseudo.into(),
            firstname: None,
            lastname: None,
        }
    }

    pub fn with_names(mut self, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self.lastname = Some(lastname.into());
        self
    }

    pub fn trimmed(self) -> Self {
        Self {
            pseudo: self.pseudo.trim().to_string(),
            firstname: self.firstname.map(|name| name.trim().to_string()),
            lastname: self.lastname.map(|name| name.trim().to_string()),
        }
    }
}

/// Payload for creating a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipe {
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    #[validate(nested)]
    pub author: Author,
    #[validate(length(min = 1), custom(function = "validate_non_empty_items"))]
    pub ingredients: Vec<String>,
    #[validate(length(min = 1), custom(function = "validate_non_empty_items"))]
    pub steps: Vec<String>,
    #[validate(range(min = DIFFICULTY_MIN, max = DIFFICULTY_MAX))]
    pub difficulty: i32,
    /// Minutes
    #[validate(range(min = 0))]
    pub preparation_time: i32,
    /// Minutes
    #[validate(range(min = 0))]
    pub cooking_time: i32,
}

impl CreateRecipe {
    /// Strip surrounding whitespace from every text field, as the store does
    pub fn trimmed(self) -> Self {
        Self {
            category: self.category.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            author: self.author.trimmed(),
            ingredients: trim_all(self.ingredients),
            steps: trim_all(self.steps),
            ..self
        }
    }
}

/// Partial update: omitted fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    /// Replaces the embedded author as a whole
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1), custom(function = "validate_non_empty_items"))]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1), custom(function = "validate_non_empty_items"))]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = DIFFICULTY_MIN, max = DIFFICULTY_MAX))]
    pub difficulty: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub preparation_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub cooking_time: Option<i32>,
}

impl UpdateRecipe {
    pub fn trimmed(self) -> Self {
        Self {
            category: self.category.map(|v| v.trim().to_string()),
            name: self.name.map(|v| v.trim().to_string()),
            description: self.description.map(|v| v.trim().to_string()),
            author: self.author.map(Author::trimmed),
            ingredients: self.ingredients.map(trim_all),
            steps: self.steps.map(trim_all),
            ..self
        }
    }
}

/// A recipe as persisted in the store.
///
/// Carries bookkeeping that never leaves the data-access layer; callers get
/// a [`crate::projection::Recipe`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub author: Author,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub difficulty: i32,
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub preparation_time: i32,
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub cooking_time: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecipeRecord {
    /// Build the record stored for `input` under `id`
    pub fn new(id: RecipeId, input: CreateRecipe) -> Self {
        let input = input.trimmed();
        let now = Utc::now();
        Self {
            id,
            category: input.category,
            name: input.name,
            description: input.description,
            author: input.author,
            ingredients: input.ingredients,
            steps: input.steps,
            difficulty: input.difficulty,
            preparation_time: input.preparation_time,
            cooking_time: input.cooking_time,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Merge the fields present in `update`
    pub fn apply_update(&mut self, update: UpdateRecipe) {
        let update = update.trimmed();
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(steps) = update.steps {
            self.steps = steps;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(preparation_time) = update.preparation_time {
            self.preparation_time = preparation_time;
        }
        if let Some(cooking_time) = update.cooking_time {
            self.cooking_time = cooking_time;
        }
        self.updated_at = Some(Utc::now());
    }

    /// Case-insensitive match on the (name, author.pseudo) uniqueness key
    pub fn has_key(&self, name: &str, pseudo: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && self.author.pseudo.to_lowercase() == pseudo.to_lowercase()
    }
}
