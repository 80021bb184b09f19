//! Application layer - use cases orchestrating domain and persistence

pub mod services;
