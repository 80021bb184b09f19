//! Aggregates - consistency units spanning multiple entities

mod character_sheet;

pub use character_sheet::{CharacterSheet, HeldItem, InstantiationOverrides, KnownSkill};
