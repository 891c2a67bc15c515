//! Configuration management for the inventory core
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with INV_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AlertThresholds;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Stock alert threshold configuration
    pub alerts: AlertConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Stock at or below this level opens a MEDIUM priority alert
    pub low_stock_threshold: i32,

    /// Stock at or below this level escalates to HIGH priority
    pub critical_stock_threshold: i32,
}

impl AlertConfig {
    /// The threshold policy handed to the alert and reporting services.
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            critical_stock: self.critical_stock_threshold,
            low_stock: self.low_stock_threshold,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            critical_stock_threshold: 2,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = std::env::var("INV_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("alerts.low_stock_threshold", 5)?
            .set_default("alerts.critical_stock_threshold", 2)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INV_ prefix)
            .add_source(
                Environment::with_prefix("INV")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Build the connection pool the services run on.
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.database.max_connections)
            .min_connections(self.database.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&self.database.url)
            .await
    }
}
