//! Domain layer - core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, Item, Skill
//! - Value Objects: identifiers, ability scores, combat stats, proficiency
//! - Aggregates: the character sheet (character + associations)
//! - Domain Services: the randomization policy

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
