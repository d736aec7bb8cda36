//! Recipe Service - Domain rules layer
//!
//! Every store failure is classified here, once: duplicate keys become
//! [`RecipeError::Conflict`], missing ids become [`RecipeError::NotFound`] and
//! anything else becomes [`RecipeError::Unprocessable`]. Empty listings are
//! `Ok(None)`.

use rand::Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{RecipeError, RecipeResult, StoreError};
use crate::models::{CreateRecipe, RecipeId, UpdateRecipe};
use crate::projection::{Recipe, project, project_all};
use crate::repository::RecipeRepository;
use crate::sort::SortSpec;

/// Recipe service enforcing domain rules on top of a repository.
///
/// Holds no recipe state of its own; the store is the only source of truth.
pub struct RecipeService<R: RecipeRepository> {
    repository: Arc<R>,
}

impl<R: RecipeRepository> Clone for RecipeService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Clamp a random draw to the current population.
///
/// The population may shrink between enumeration and pick, so `draw` is not
/// trusted to be in range.
fn clamp_index(draw: usize, len: usize) -> Option<usize> {
    len.checked_sub(1).map(|last| draw.min(last))
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn unprocessable(err: StoreError) -> RecipeError {
    warn!(error = %err, "Recipe store failure");
    RecipeError::from(err)
}

impl<R: RecipeRepository> RecipeService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a recipe; a taken (name, author.pseudo) pair is a Conflict.
    #[instrument(skip(self, input), fields(recipe_name = %input.name, pseudo = %input.author.pseudo))]
    pub async fn create(&self, input: CreateRecipe) -> RecipeResult<Recipe> {
        let input = input.trimmed();
        let name = input.name.clone();
        let pseudo = input.author.pseudo.clone();

        match self.repository.insert(input).await {
            Ok(record) => {
                info!(recipe_id = %record.id, "Recipe created");
                Ok(project(record))
            }
            Err(StoreError::DuplicateKey(_)) => {
                warn!("Recipe already exists");
                Err(RecipeError::Conflict { name, pseudo })
            }
            Err(err) => Err(unprocessable(err)),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> RecipeResult<Option<Vec<Recipe>>> {
        let records = self.repository.list().await.map_err(unprocessable)?;
        Ok(records.map(project_all))
    }

    #[instrument(skip(self, id), fields(recipe_id = %id))]
    pub async fn find_by_id(&self, id: RecipeId) -> RecipeResult<Recipe> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(unprocessable)?
            .map(project)
            .ok_or(RecipeError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_category(&self, category: &str) -> RecipeResult<Option<Vec<Recipe>>> {
        let records = self
            .repository
            .list_by_category(category)
            .await
            .map_err(unprocessable)?;
        Ok(records.map(project_all))
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> RecipeResult<Option<Vec<Recipe>>> {
        let records = self
            .repository
            .list_by_name(name)
            .await
            .map_err(unprocessable)?;
        Ok(records.map(project_all))
    }

    #[instrument(skip(self))]
    pub async fn find_all_categories(&self) -> RecipeResult<Option<Vec<String>>> {
        let categories = self
            .repository
            .list_distinct_categories()
            .await
            .map_err(unprocessable)?;
        Ok(non_empty(categories))
    }

    #[instrument(skip(self))]
    pub async fn find_all_names(&self) -> RecipeResult<Option<Vec<String>>> {
        let names = self
            .repository
            .list_distinct_names()
            .await
            .map_err(unprocessable)?;
        Ok(non_empty(names))
    }

    /// Pick one recipe uniformly at random.
    #[instrument(skip(self))]
    pub async fn find_random(&self) -> RecipeResult<Option<Recipe>> {
        let Some(mut records) = self.repository.list().await.map_err(unprocessable)? else {
            return Ok(None);
        };

        let draw = rand::rng().random_range(0..records.len().max(1));
        let picked = clamp_index(draw, records.len()).map(|index| records.swap_remove(index));
        Ok(picked.map(project))
    }

    /// First recipe in store order
    #[instrument(skip(self))]
    pub async fn find_first(&self) -> RecipeResult<Option<Recipe>> {
        let record = self.repository.first().await.map_err(unprocessable)?;
        Ok(record.map(project))
    }

    #[instrument(skip(self, id), fields(recipe_id = %id))]
    pub async fn delete(&self, id: RecipeId) -> RecipeResult<()> {
        match self.repository.remove_by_id(id).await {
            Ok(Some(_)) => {
                info!("Recipe deleted");
                Ok(())
            }
            Ok(None) => Err(RecipeError::NotFound(id)),
            Err(err) => Err(unprocessable(err)),
        }
    }

    /// Merge `partial` into the recipe; a merged pair that collides with
    /// another recipe is a Conflict.
    #[instrument(skip(self, id, partial), fields(recipe_id = %id))]
    pub async fn update(&self, id: RecipeId, partial: UpdateRecipe) -> RecipeResult<Recipe> {
        let partial = partial.trimmed();
        let requested_name = partial.name.clone();
        let requested_pseudo = partial.author.as_ref().map(|author| author.pseudo.clone());

        match self.repository.update_by_id(id, partial).await {
            Ok(Some(record)) => {
                info!("Recipe updated");
                Ok(project(record))
            }
            Ok(None) => Err(RecipeError::NotFound(id)),
            Err(StoreError::DuplicateKey(_)) => {
                warn!("Updated recipe collides with an existing one");
                self.merged_conflict(id, requested_name, requested_pseudo)
                    .await
            }
            Err(err) => Err(unprocessable(err)),
        }
    }

    /// Build the Conflict for a rejected update, reading the current record
    /// for whichever half of the key the update left out.
    async fn merged_conflict(
        &self,
        id: RecipeId,
        name: Option<String>,
        pseudo: Option<String>,
    ) -> RecipeResult<Recipe> {
        let (name, pseudo) = match (name, pseudo) {
            (Some(name), Some(pseudo)) => (name, pseudo),
            (name, pseudo) => {
                let current = self
                    .repository
                    .get_by_id(id)
                    .await
                    .map_err(unprocessable)?
                    .ok_or(RecipeError::NotFound(id))?;
                (
                    name.unwrap_or(current.name),
                    pseudo.unwrap_or(current.author.pseudo),
                )
            }
        };

        Err(RecipeError::Conflict { name, pseudo })
    }

    /// All recipes ordered by `sort`. An empty store yields an empty list.
    #[instrument(skip(self, sort), fields(sort = %sort))]
    pub async fn find_and_sort(&self, sort: &SortSpec) -> RecipeResult<Vec<Recipe>> {
        let records = self
            .repository
            .list_sorted(sort)
            .await
            .map_err(unprocessable)?;
        Ok(project_all(records))
    }
}
