//! SQLite persistence adapters
//!
//! This module implements the repository pattern over SQLite, mapping
//! raw rows to domain aggregates and back. Repositories never commit;
//! services own the transaction boundary.

mod character_repository;
mod connection;
mod item_repository;
mod skill_repository;

pub use character_repository::CharacterRepository;
pub use connection::Database;
pub use item_repository::ItemRepository;
pub use skill_repository::SkillRepository;

use sqlx::{Sqlite, Transaction};

/// Combined repository providing access to all entity repositories and
/// the transaction boundary they run inside
#[derive(Clone)]
pub struct SqliteRepository {
    database: Database,
}

impl SqliteRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Open the transaction for one aggregate operation
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.database.begin().await
    }

    pub fn characters(&self) -> CharacterRepository {
        CharacterRepository::new()
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new()
    }

    pub fn skills(&self) -> SkillRepository {
        SkillRepository::new()
    }
}
