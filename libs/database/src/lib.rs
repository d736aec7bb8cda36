//! Database connectors shared by the domain crates.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connection and configuration
//! - `config` - `core_config::FromEnv` support for the connection settings
//! - `all` - Everything above
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_database};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "cookbook");
//! let db = connect_database(&config).await?;
//! let recipes = db.collection::<mongodb::bson::Document>("recipes");
//! ```

pub mod error;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use error::{DatabaseError, DatabaseResult};
