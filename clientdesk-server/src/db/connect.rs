//! Database connector
//!
//! Opens the MongoDB client exactly once at startup and verifies it with a
//! `ping`. There is no retry: a failed attempt is terminal for the process.

use std::time::Duration;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tracing::info;

use super::mongo::MongoStore;
use super::DbError;

/// Default bound on server selection when the URI does not set one.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// MongoDB connection settings
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub uri: String,
    /// Database holding the `client` and `employees` collections
    pub database: String,
    /// Server selection timeout applied when the URI leaves it unset
    pub connect_timeout: Duration,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "clientdesk".to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Connect to MongoDB and return a store for the configured database.
///
/// # Errors
///
/// Returns an error if the URI is invalid or the server does not answer
/// `ping` within the server selection timeout.
///
/// # Example
///
/// ```ignore
/// let store = connect(&MongoConfig::default()).await?;
/// ```
pub async fn connect(config: &MongoConfig) -> Result<MongoStore, DbError> {
    info!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(config.uri.as_str()).await?;
    if options.server_selection_timeout.is_none() {
        options.server_selection_timeout = Some(config.connect_timeout);
    }
    if options.app_name.is_none() {
        options.app_name = Some("clientdesk".to_string());
    }

    let client = Client::with_options(options)?;
    let database = client.database(&config.database);
    database.run_command(doc! { "ping": 1 }).await?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(MongoStore::new(database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MongoConfig::default();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "clientdesk");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn invalid_uri_is_rejected() {
        let config = MongoConfig {
            uri: "not-a-mongodb-uri".into(),
            ..MongoConfig::default()
        };
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Mongo(_)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connects_and_pings() {
        let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI required");
        let config = MongoConfig {
            uri,
            ..MongoConfig::default()
        };
        let store = connect(&config).await.expect("connect failed");
        assert_eq!(store.db_name(), "clientdesk");
    }
}
