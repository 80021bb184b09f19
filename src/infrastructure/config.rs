//! Application configuration

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// Spread of the uniform modifier policy applied at generation time
    pub modifier_spread: i32,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:npcgen.db".to_string()),
            modifier_spread: env::var("MODIFIER_SPREAD")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("MODIFIER_SPREAD must be an integer")?,
        })
    }
}
