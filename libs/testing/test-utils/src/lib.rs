//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongodb")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `mongodb` (default): Enables MongoDB test infrastructure
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let collection = builder.collection_name("recipes");
//!     let recipe_name = builder.name("recipe", "main");
//! }
//! ```

#[cfg(feature = "mongodb")]
mod mongo;

#[cfg(feature = "mongodb")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_recipe");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("recipe", "main"), "test-recipe-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Author handle unique to this test
    pub fn pseudo(&self, suffix: &str) -> String {
        format!("chef-{}-{}", self.seed, suffix)
    }

    /// Collection name unique to this test, so suites can share a database
    pub fn collection_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::collections::HashSet;
    use std::fmt::Debug;
    use std::hash::Hash;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `values` never increases from one element to the next
    pub fn assert_non_increasing<T: PartialOrd + Debug>(values: &[T], context: &str) {
        for pair in values.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "{}: {:?} followed by larger {:?}",
                context,
                pair[0],
                pair[1]
            );
        }
    }

    /// Assert that two collections hold the same elements, ignoring order,
    /// and that `actual` has no duplicates
    pub fn assert_same_elements<T: Eq + Hash + Debug>(actual: &[T], expected: &[T], context: &str) {
        let actual_set: HashSet<&T> = actual.iter().collect();
        let expected_set: HashSet<&T> = expected.iter().collect();

        assert_eq!(
            actual_set.len(),
            actual.len(),
            "{}: duplicates in {:?}",
            context,
            actual
        );
        assert_eq!(actual_set, expected_set, "{}", context);
    }
}
