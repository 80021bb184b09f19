//! Domain services - pure business logic operations

mod modifier_policy;

pub use modifier_policy::{ModifierPolicy, UniformModifierPolicy};
