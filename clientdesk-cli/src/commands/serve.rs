//! HTTP server command
//!
//! Connects to MongoDB once, then serves the client and employee routes.
//! A failed connection ends the process; supervision is expected to restart it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use clientdesk_server::db::{connect, DbHandle, MemoryStore, MongoConfig};
use clientdesk_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CLIENTDESK_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "clientdesk")]
    pub mongodb_db: String,

    /// Seconds to wait for MongoDB at startup (unless the URI sets serverSelectionTimeoutMS)
    #[arg(long, env = "MONGODB_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Use an in-process store instead of MongoDB (data is lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    fn mongo_config(&self) -> MongoConfig {
        MongoConfig {
            uri: self.mongodb_uri.clone(),
            database: self.mongodb_db.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = DbHandle::pending();

    if args.in_memory {
        tracing::warn!("Using in-memory store; nothing is persisted");
        db.install(MemoryStore::new())
            .context("Failed to install in-memory store")?;
    } else {
        let store = match connect(&args.mongo_config()).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(database = %args.mongodb_db, "Failed to connect to DB: {}", e);
                return Err(e).context("Failed to connect to MongoDB");
            }
        };
        db.install(store).context("Failed to install MongoDB store")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting clientdesk server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(db, config).await.context("Server error")?;

    Ok(())
}
