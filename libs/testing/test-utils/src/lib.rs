//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated SQLite file in a temp directory (feature: "sqlite")
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_sqlite_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let session_id = builder.session_id("main");
//! }
//! ```

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::TestDatabase;

/// Deterministic ids and names derived from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name, so reruns produce the same data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_ingest_pageview");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.session_id("a"), "session-7-a");
    /// ```
    pub fn session_id(&self, suffix: &str) -> String {
        format!("session-{}-{}", self.seed, suffix)
    }

    /// `test-<prefix>-<seed>-<suffix>`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::fmt::Debug;

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Each value must be greater than the one before it.
    pub fn assert_strictly_ascending<T: PartialOrd + Debug>(values: &[T], context: &str) {
        for pair in values.windows(2) {
            assert!(
                pair[0] < pair[1],
                "{}: expected ascending order, found {:?} before {:?}",
                context,
                pair[0],
                pair[1]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.session_id("a"), builder2.session_id("a"));
        assert_eq!(builder1.name("category", "x"), builder2.name("category", "x"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.session_id("a"), builder2.session_id("a"));
    }

    #[test]
    fn test_assert_strictly_ascending() {
        assertions::assert_strictly_ascending(&[1, 2, 5], "ids");
    }

    #[test]
    #[should_panic(expected = "ids: expected ascending order")]
    fn test_assert_strictly_ascending_panics() {
        assertions::assert_strictly_ascending(&[1, 1], "ids");
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_database_is_migrated() {
        use sea_orm::ConnectionTrait;

        let db = TestDatabase::new().await;
        db.connection()
            .execute_unprepared("INSERT INTO sessions (id) VALUES ('s1')")
            .await
            .unwrap();
        assert!(db.path.exists());
    }
}
