//! Infrastructure layer - external adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapter for data storage
//! - Config: Application configuration

pub mod config;
pub mod persistence;
