//! NPC generation engine - character templates and randomized instantiation
//!
//! The engine stores reusable character templates (with their item and
//! skill associations) in SQLite and generates new, independent character
//! instances by deep-cloning a template and applying bounded random
//! modifiers. Presentation layers (HTTP, CLI) sit on top of the service
//! traits exposed here and are out of scope for this crate.

pub mod application;
pub mod domain;
pub mod infrastructure;
