use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use crate::error::{DatabaseError, DatabaseResult};

/// Parse the connection string and apply pool/timeout settings from `config`.
pub async fn client_options(config: &MongoConfig) -> DatabaseResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Connect and verify the server answers a `ping`.
///
/// A single attempt: an unreachable server surfaces as
/// `DatabaseError::ConnectionFailed` instead of being retried.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    let client = Client::with_options(client_options(config).await?)?;

    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// Connect and return the configured database handle.
pub async fn connect_database(config: &MongoConfig) -> DatabaseResult<Database> {
    let client = connect(config).await?;
    Ok(client.database(&config.database))
}
