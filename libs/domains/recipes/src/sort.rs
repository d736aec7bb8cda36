//! Sort specification: `field` for ascending, `-field` for descending.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

use crate::models::RecipeRecord;

/// Fields a listing can be ordered by, named as in the public shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, IntoStaticStr)]
pub enum SortField {
    #[strum(serialize = "category")]
    Category,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "description")]
    Description,
    #[strum(serialize = "author.pseudo")]
    AuthorPseudo,
    #[strum(serialize = "difficulty")]
    Difficulty,
    #[strum(serialize = "preparationTime")]
    PreparationTime,
    #[strum(serialize = "cookingTime")]
    CookingTime,
}

impl SortField {
    /// Document path of the field in the store
    pub fn path(&self) -> &'static str {
        (*self).into()
    }

    fn compare(&self, a: &RecipeRecord, b: &RecipeRecord) -> Ordering {
        match self {
            SortField::Category => a.category.cmp(&b.category),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::AuthorPseudo => a.author.pseudo.cmp(&b.author.pseudo),
            SortField::Difficulty => a.difficulty.cmp(&b.difficulty),
            SortField::PreparationTime => a.preparation_time.cmp(&b.preparation_time),
            SortField::CookingTime => a.cooking_time.cmp(&b.cooking_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// MongoDB sort order value
    pub fn order(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortSpecError {
    #[error("Sort method must name a field")]
    Empty,

    #[error("Cannot sort by '{field}', expected one of: {expected}")]
    UnknownField { field: String, expected: String },
}

/// Parsed sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Order two records; equal keys compare `Equal` so a stable sort keeps
    /// their existing order.
    pub fn compare(&self, a: &RecipeRecord, b: &RecipeRecord) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortSpec {
    type Err = SortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (direction, name) = match s.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, s),
        };

        if name.is_empty() {
            return Err(SortSpecError::Empty);
        }

        let field = SortField::from_str(name).map_err(|_| SortSpecError::UnknownField {
            field: name.to_string(),
            expected: SortField::iter()
                .map(|f| f.path())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field.path()),
            SortDirection::Descending => write!(f, "-{}", self.field.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ascending_and_descending() {
        assert_eq!(
            "difficulty".parse::<SortSpec>(),
            Ok(SortSpec::ascending(SortField::Difficulty))
        );
        assert_eq!(
            "-difficulty".parse::<SortSpec>(),
            Ok(SortSpec::descending(SortField::Difficulty))
        );
        assert_eq!(
            "-author.pseudo".parse::<SortSpec>(),
            Ok(SortSpec::descending(SortField::AuthorPseudo))
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!("".parse::<SortSpec>(), Err(SortSpecError::Empty));
        assert_eq!("-".parse::<SortSpec>(), Err(SortSpecError::Empty));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let err = "-calories".parse::<SortSpec>().unwrap_err();
        assert!(matches!(err, SortSpecError::UnknownField { ref field, .. } if field == "calories"));
        assert!(err.to_string().contains("preparationTime"));
    }

    #[test]
    fn test_display_uses_dash_prefix() {
        assert_eq!(SortSpec::descending(SortField::PreparationTime).to_string(), "-preparationTime");
        assert_eq!(SortSpec::ascending(SortField::Name).to_string(), "name");
    }

    #[test]
    fn test_paths_parse_back_to_field() {
        assert_eq!(SortField::AuthorPseudo.path(), "author.pseudo");
        assert_eq!(SortField::CookingTime.path(), "cookingTime");
        for field in SortField::iter() {
            assert_eq!(field.path().parse::<SortField>(), Ok(field));
        }
    }

    #[test]
    fn test_direction_order() {
        assert_eq!(SortDirection::Ascending.order(), 1);
        assert_eq!(SortDirection::Descending.order(), -1);
    }
}
