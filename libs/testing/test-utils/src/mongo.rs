//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that runs a MongoDB container for testing.

use database::mongodb::{MongoConfig, connect_database};
use mongodb::Database;
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

const MONGO_PORT: u16 = 27017;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let recipes = mongo.database().collection::<mongodb::bson::Document>("recipes");
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    database: Database,
    config: MongoConfig,
}

impl TestMongo {
    /// Start a container and connect to a fresh `test` database
    pub async fn new() -> Self {
        Self::with_database("test").await
    }

    /// Start a container and connect to `database_name`
    pub async fn with_database(database_name: &str) -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(MONGO_PORT)
            .await
            .expect("Failed to get MongoDB port");

        let config = MongoConfig::with_database(
            format!("mongodb://127.0.0.1:{}", host_port),
            database_name,
        )
        .with_pool_size(10, 1)
        .with_server_selection_timeout(10);

        let database = connect_database(&config)
            .await
            .expect("Failed to connect to MongoDB");

        tracing::info!(port = host_port, database = database_name, "Test MongoDB ready");

        Self {
            container,
            database,
            config,
        }
    }

    /// Database handle (cheap to clone)
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Connection settings pointing at the container
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    pub fn connection_string(&self) -> &str {
        self.config.url()
    }
}

// Container is automatically cleaned up when TestMongo is dropped
impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Document, doc};

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_mongo_insert_find() {
        let mongo = TestMongo::new().await;
        let collection = mongo.database().collection::<Document>("smoke");

        collection
            .insert_one(doc! { "name": "Tadaramisu" })
            .await
            .unwrap();
        let found = collection
            .find_one(doc! { "name": "Tadaramisu" })
            .await
            .unwrap();

        assert!(found.is_some());
    }
}
