//! Request parameter validation for the transport layer.
//!
//! The service trusts its inputs; whoever accepts requests runs these (and
//! `Validate` on [`crate::CreateRecipe`] / [`crate::UpdateRecipe`]) first.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::RecipeId;
use crate::sort::SortSpec;

fn validate_object_id(id: &str) -> Result<(), ValidationError> {
    id.parse::<RecipeId>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("object_id"))
}

fn validate_sort_method(sort_method: &str) -> Result<(), ValidationError> {
    sort_method
        .parse::<SortSpec>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("sort_method"))
}

/// `:id` path parameter
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IdParams {
    #[validate(custom(function = "validate_object_id"))]
    pub id: String,
}

impl IdParams {
    /// Parsed id, `None` if the parameter is not a valid ObjectId
    pub fn recipe_id(&self) -> Option<RecipeId> {
        self.id.parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryParams {
    #[validate(length(min = 1))]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NameParams {
    #[validate(length(min = 1))]
    pub name: String,
}

/// `:sortMethod` path parameter, e.g. `-difficulty`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SortParams {
    #[serde(rename = "sortMethod")]
    #[validate(length(min = 1), custom(function = "validate_sort_method"))]
    pub sort_method: String,
}

impl SortParams {
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_method.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortField;

    #[test]
    fn test_id_params() {
        let id = RecipeId::new();
        let params = IdParams { id: id.to_hex() };
        assert!(params.validate().is_ok());
        assert_eq!(params.recipe_id(), Some(id));

        let params = IdParams {
            id: "12345".to_string(),
        };
        let errors = params.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("id"));
        assert_eq!(params.recipe_id(), None);
    }

    #[test]
    fn test_category_params_reject_empty() {
        let params = CategoryParams {
            category: String::new(),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_sort_params_from_json() {
        let params: SortParams =
            serde_json::from_value(serde_json::json!({ "sortMethod": "-difficulty" })).unwrap();

        assert!(params.validate().is_ok());
        assert_eq!(
            params.sort_spec(),
            Some(SortSpec::descending(SortField::Difficulty))
        );
    }

    #[test]
    fn test_sort_params_reject_unknown_field() {
        let params = SortParams {
            sort_method: "-calories".to_string(),
        };
        assert!(params.validate().is_err());
        assert_eq!(params.sort_spec(), None);
    }
}
