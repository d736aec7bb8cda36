//! Recipes Domain
//!
//! Data access and domain rules for a recipe catalog stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ Validators  │  ← Request parameter checks (run by the transport layer)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Domain rules, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Stored records, payloads, public projection
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_recipes::{
//!     MongoRecipeRepository, RecipeService, RecipeStoreConfig, SortSpec,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RecipeStoreConfig::from_env()?;
//! let repository = MongoRecipeRepository::connect(&config).await?;
//! repository.init_indexes().await?;
//!
//! let service = RecipeService::new(repository);
//! let hardest_first = service.find_and_sort(&"-difficulty".parse::<SortSpec>()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod projection;
pub mod repository;
pub mod service;
pub mod sort;
pub mod validators;

// Re-export commonly used types
pub use error::{RecipeError, RecipeResult, StoreError, StoreResult};
pub use models::{Author, CreateRecipe, RecipeId, RecipeRecord, UpdateRecipe};
pub use self::mongodb::{MongoRecipeRepository, RecipeStoreConfig};
pub use projection::Recipe;
pub use repository::{InMemoryRecipeRepository, RecipeRepository};
pub use service::RecipeService;
pub use sort::{SortDirection, SortField, SortSpec, SortSpecError};
pub use validators::{CategoryParams, IdParams, NameParams, SortParams};
