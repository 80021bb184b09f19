//! SQLite connection management and schema bootstrap

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Embedded schema, applied idempotently on connect.
///
/// Item and skill dedup keys are backed by UNIQUE constraints so that
/// concurrent template creation racing on the same new row surfaces as a
/// unique violation the repositories can resolve. Template names are
/// unique among templates only; generated instances may share a name.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS race (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS class (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS alignment (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS character (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER,
    name TEXT NOT NULL,
    gender TEXT,
    hints TEXT,
    backstory TEXT,
    plot_hook TEXT,
    race_id INTEGER NOT NULL,
    class_id INTEGER NOT NULL,
    alignment_id INTEGER NOT NULL,
    template_id INTEGER REFERENCES character(id),
    level INTEGER NOT NULL,
    strength INTEGER NOT NULL,
    dexterity INTEGER NOT NULL,
    constitution INTEGER NOT NULL,
    intelligence INTEGER NOT NULL,
    wisdom INTEGER NOT NULL,
    charisma INTEGER NOT NULL,
    perception INTEGER NOT NULL,
    armor_class INTEGER NOT NULL,
    hit_points INTEGER NOT NULL,
    speed INTEGER NOT NULL,
    fortitude_save INTEGER NOT NULL,
    reflex_save INTEGER NOT NULL,
    will_save INTEGER NOT NULL,
    is_template INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_character_template_name
    ON character(name) WHERE is_template = 1;

CREATE INDEX IF NOT EXISTS idx_character_template_id
    ON character(template_id);

CREATE TABLE IF NOT EXISTS item (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    item_type TEXT NOT NULL,
    damage TEXT NOT NULL DEFAULT '',
    damage_type TEXT NOT NULL DEFAULT '',
    traits TEXT NOT NULL DEFAULT '[]',
    UNIQUE(name, damage, damage_type, item_type, traits)
);

CREATE TABLE IF NOT EXISTS skill (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS character_item (
    character_id INTEGER NOT NULL REFERENCES character(id) ON DELETE CASCADE,
    item_id INTEGER NOT NULL REFERENCES item(id),
    proficiency INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (character_id, item_id)
);

CREATE TABLE IF NOT EXISTS character_skill (
    character_id INTEGER NOT NULL REFERENCES character(id) ON DELETE CASCADE,
    skill_id INTEGER NOT NULL REFERENCES skill(id),
    proficiency INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (character_id, skill_id)
);
"#;

/// Connection pool wrapper for the relational store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at `url` and apply the schema
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        let database = Self { pool };
        database.initialize_schema().await?;
        Ok(database)
    }

    /// In-memory database for tests. A single pooled connection keeps the
    /// database alive and shared for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        let database = Self { pool };
        database.initialize_schema().await?;
        Ok(database)
    }

    async fn initialize_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to initialize database schema")?;
        tracing::debug!("Database schema initialized");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a transaction; every aggregate operation runs inside exactly one
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
