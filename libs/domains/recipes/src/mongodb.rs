//! MongoDB implementation of RecipeRepository

use async_trait::async_trait;
use chrono::Utc;
use core_config::{ConfigError, FromEnv, env_or_default};
use database::mongodb::{MongoConfig, connect_database};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_document},
    options::{Collation, CollationStrength, IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::StoreResult;
use crate::models::{CreateRecipe, RecipeId, RecipeRecord, UpdateRecipe};
use crate::repository::RecipeRepository;
use crate::sort::SortSpec;

pub const DEFAULT_COLLECTION: &str = "recipes";

/// Name of the (name, author.pseudo) unique index
pub const UNIQUE_KEY_INDEX: &str = "idx_name_author_pseudo_unique";

/// Where the recipe collection lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeStoreConfig {
    pub mongo: MongoConfig,
    pub collection: String,
}

impl RecipeStoreConfig {
    pub fn new(mongo: MongoConfig) -> Self {
        Self {
            mongo,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

/// Environment variables: everything [`MongoConfig`] reads, plus
/// `RECIPES_COLLECTION` (default: `recipes`).
impl FromEnv for RecipeStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mongo: MongoConfig::from_env()?,
            collection: env_or_default("RECIPES_COLLECTION", DEFAULT_COLLECTION),
        })
    }
}

/// MongoDB implementation of the RecipeRepository
#[derive(Clone)]
pub struct MongoRecipeRepository {
    collection: Collection<RecipeRecord>,
}

impl MongoRecipeRepository {
    /// Repository over the `recipes` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<RecipeRecord>(collection_name);
        Self { collection }
    }

    /// Connect once (no retries) and open the configured collection.
    pub async fn connect(config: &RecipeStoreConfig) -> StoreResult<Self> {
        let db = connect_database(&config.mongo).await?;
        Ok(Self::with_collection(&db, &config.collection))
    }

    /// Create the indexes the repository relies on.
    ///
    /// The unique index uses a strength-2 collation, so uniqueness of
    /// (name, author.pseudo) ignores case.
    pub async fn init_indexes(&self) -> StoreResult<()> {
        let case_insensitive = Collation::builder()
            .locale("en".to_string())
            .strength(CollationStrength::Secondary)
            .build();

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name": 1, "author.pseudo": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .collation(case_insensitive)
                        .name(UNIQUE_KEY_INDEX.to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Recipe indexes created successfully");
        Ok(())
    }

    fn id_filter(id: RecipeId) -> Document {
        doc! { "_id": id.as_object_id() }
    }

    /// Sort document for `sort`, with `_id` as tie-breaker
    fn build_sort(sort: &SortSpec) -> Document {
        let mut document = Document::new();
        document.insert(sort.field.path(), sort.direction.order());
        document.insert("_id", 1);
        document
    }

    /// `$set` document for a partial update
    fn build_update(partial: UpdateRecipe) -> StoreResult<Document> {
        let mut set = to_document(&partial.trimmed())?;
        set.insert("updatedAt", Utc::now().to_rfc3339());
        Ok(doc! { "$set": set })
    }

    async fn find_many(&self, filter: Document) -> StoreResult<Option<Vec<RecipeRecord>>> {
        let cursor = self.collection.find(filter).await?;
        let recipes: Vec<RecipeRecord> = cursor.try_collect().await?;
        Ok((!recipes.is_empty()).then_some(recipes))
    }

    async fn distinct_strings(&self, field: &str) -> StoreResult<Vec<String>> {
        let values = self.collection.distinct(field, doc! {}).await?;
        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for MongoRecipeRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Option<Vec<RecipeRecord>>> {
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn first(&self) -> StoreResult<Option<RecipeRecord>> {
        let recipe = self.collection.find_one(doc! {}).await?;
        Ok(recipe)
    }

    #[instrument(skip(self, id), fields(recipe_id = %id))]
    async fn get_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>> {
        let recipe = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(recipe)
    }

    #[instrument(skip(self))]
    async fn list_by_category(&self, category: &str) -> StoreResult<Option<Vec<RecipeRecord>>> {
        self.find_many(doc! { "category": category }).await
    }

    #[instrument(skip(self))]
    async fn list_by_name(&self, name: &str) -> StoreResult<Option<Vec<RecipeRecord>>> {
        self.find_many(doc! { "name": name }).await
    }

    #[instrument(skip(self))]
    async fn list_distinct_categories(&self) -> StoreResult<Vec<String>> {
        self.distinct_strings("category").await
    }

    #[instrument(skip(self))]
    async fn list_distinct_names(&self) -> StoreResult<Vec<String>> {
        self.distinct_strings("name").await
    }

    #[instrument(skip(self, input), fields(recipe_name = %input.name))]
    async fn insert(&self, input: CreateRecipe) -> StoreResult<RecipeRecord> {
        let recipe = RecipeRecord::new(RecipeId::new(), input);

        self.collection.insert_one(&recipe).await?;

        tracing::info!(recipe_id = %recipe.id, "Recipe inserted");
        Ok(recipe)
    }

    #[instrument(skip(self, id), fields(recipe_id = %id))]
    async fn remove_by_id(&self, id: RecipeId) -> StoreResult<Option<RecipeRecord>> {
        let removed = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;
        Ok(removed)
    }

    #[instrument(skip(self, id, partial), fields(recipe_id = %id))]
    async fn update_by_id(
        &self,
        id: RecipeId,
        partial: UpdateRecipe,
    ) -> StoreResult<Option<RecipeRecord>> {
        let update = Self::build_update(partial)?;

        let updated = self
            .collection
            .find_one_and_update(Self::id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self, sort), fields(sort = %sort))]
    async fn list_sorted(&self, sort: &SortSpec) -> StoreResult<Vec<RecipeRecord>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(Self::build_sort(sort))
            .await?;
        let recipes: Vec<RecipeRecord> = cursor.try_collect().await?;
        Ok(recipes)
    }
}
