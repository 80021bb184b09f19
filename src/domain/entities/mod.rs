//! Domain entities

mod character;
mod item;
mod skill;

pub use character::Character;
pub use item::{Item, ItemProperties};
pub use skill::{Skill, SkillProperties};
