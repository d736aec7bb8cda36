use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateRecipe, RecipeId, RecipeRecord, UpdateRecipe};
use crate::sort::SortSpec;

/// Repository trait for Recipe persistence
///
/// A thin typed layer over the store. `None` means nothing was found; store
/// failures come back as [`StoreError`] without further interpretation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All records, or `None` when the collection is empty
    async fn list(&self) -> StoreResult<Option<Vec<RecipeRecord>>>;

    /// Earliest record in store order, without reading the rest
    async fn first(&self) -> StoreResult<Option<RecipeRecord>>;

    async fn get_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>>;

    /// Exact-match filter on category; `None` when nothing matches
    async fn list_by_category(&self, category: &str) -> StoreResult<Option<Vec<RecipeRecord>>>;

    /// Exact-match filter on name; `None` when nothing matches
    async fn list_by_name(&self, name: &str) -> StoreResult<Option<Vec<RecipeRecord>>>;

    /// Distinct categories, in no particular order
    async fn list_distinct_categories(&self) -> StoreResult<Vec<String>>;

    /// Distinct names, in no particular order
    async fn list_distinct_names(&self) -> StoreResult<Vec<String>>;

    /// Store a new recipe and return it with its assigned id.
    ///
    /// Fails with [`StoreError::DuplicateKey`] when (name, author.pseudo)
    /// is already taken.
    async fn insert(&self, input: CreateRecipe) -> StoreResult<RecipeRecord>;

    /// Remove and return the record, or `None` if it did not exist
    async fn remove_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>>;

    /// Merge `partial` into the record and return the merged result.
    ///
    /// The merged (name, author.pseudo) pair is checked against every other
    /// record as part of the same store operation.
    async fn update_by_id(
        &self,
        id: RecipeId,
        partial: UpdateRecipe,
    ) -> StoreResult<Option<RecipeRecord>>;

    /// All records ordered by `sort`. An empty collection yields an empty list.
    async fn list_sorted(&self, sort: &SortSpec) -> StoreResult<Vec<RecipeRecord>>;
}

/// In-memory store (for development/testing).
///
/// Keeps insertion order, which serves as its native order for unsorted and
/// tied results, and enforces the same case-insensitive uniqueness as the
/// MongoDB unique index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecipeRepository {
    recipes: Arc<RwLock<Vec<RecipeRecord>>>,
}

impl InMemoryRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `records`, kept in the given order
    pub fn with_records(records: Vec<RecipeRecord>) -> Self {
        Self {
            recipes: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored records
    pub async fn count(&self) -> usize {
        self.recipes.read().await.len()
    }

    fn duplicate_key(name: &str, pseudo: &str) -> StoreError {
        StoreError::DuplicateKey(format!(
            "E11000 duplicate key error collection: recipes index: name_1_author.pseudo_1 \
             dup key: {{ name: \"{name}\", author.pseudo: \"{pseudo}\" }}"
        ))
    }

    async fn filter_by<F>(&self, predicate: F) -> Option<Vec<RecipeRecord>>
    where
        F: Fn(&RecipeRecord) -> bool,
    {
        let recipes = self.recipes.read().await;
        let matches: Vec<RecipeRecord> = recipes.iter().filter(|r| predicate(r)).cloned().collect();
        (!matches.is_empty()).then_some(matches)
    }

    async fn distinct_by<F>(&self, key: F) -> Vec<String>
    where
        F: Fn(&RecipeRecord) -> &str,
    {
        let recipes = self.recipes.read().await;
        let mut values: Vec<String> = Vec::new();
        for recipe in recipes.iter() {
            let value = key(recipe);
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn list(&self) -> StoreResult<Option<Vec<RecipeRecord>>> {
        Ok(self.filter_by(|_| true).await)
    }

    async fn first(&self) -> StoreResult<Option<RecipeRecord>> {
        Ok(self.recipes.read().await.first().cloned())
    }

    async fn get_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_category(&self, category: &str) -> StoreResult<Option<Vec<RecipeRecord>>> {
        Ok(self.filter_by(|r| r.category == category).await)
    }

    async fn list_by_name(&self, name: &str) -> StoreResult<Option<Vec<RecipeRecord>>> {
        Ok(self.filter_by(|r| r.name == name).await)
    }

    async fn list_distinct_categories(&self) -> StoreResult<Vec<String>> {
        Ok(self.distinct_by(|r| r.category.as_str()).await)
    }

    async fn list_distinct_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.distinct_by(|r| r.name.as_str()).await)
    }

    async fn insert(&self, input: CreateRecipe) -> StoreResult<RecipeRecord> {
        let record = RecipeRecord::new(RecipeId::new(), input);
        let mut recipes = self.recipes.write().await;

        if recipes
            .iter()
            .any(|r| r.has_key(&record.name, &record.author.pseudo))
        {
            return Err(Self::duplicate_key(&record.name, &record.author.pseudo));
        }

        recipes.push(record.clone());
        tracing::debug!(recipe_id = %record.id, "Inserted recipe");
        Ok(record)
    }

    async fn remove_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>> {
        let mut recipes = self.recipes.write().await;
        let removed = recipes
            .iter()
            .position(|r| r.id == id)
            .map(|index| recipes.remove(index));
        Ok(removed)
    }

    async fn update_by_id(
        &self,
        id: RecipeId,
        partial: UpdateRecipe,
    ) -> StoreResult<Option<RecipeRecord>> {
        let mut recipes = self.recipes.write().await;

        let Some(index) = recipes.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let mut merged = recipes[index].clone();
        merged.apply_update(partial);

        if recipes
            .iter()
            .any(|r| r.id != id && r.has_key(&merged.name, &merged.author.pseudo))
        {
            return Err(Self::duplicate_key(&merged.name, &merged.author.pseudo));
        }

        recipes[index] = merged.clone();
        Ok(Some(merged))
    }

    async fn list_sorted(&self, sort: &SortSpec) -> StoreResult<Vec<RecipeRecord>> {
        let mut recipes = self.recipes.read().await.clone();
        // Vec::sort_by is stable: ties keep insertion order.
        recipes.sort_by(|a, b| sort.compare(a, b));
        Ok(recipes)
    }
}
