//! MongoDB connector and utilities

mod config;
mod connector;

pub use config::MongoConfig;
pub use connector::{client_options, connect, connect_database};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
