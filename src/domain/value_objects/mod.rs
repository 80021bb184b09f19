//! Value objects - identifiers, scores, and proficiency ranks

mod ids;
mod stats;

pub use ids::{AlignmentId, CharacterId, ClassId, ItemId, RaceId, SkillId, UserId};
pub use stats::{AbilityScores, CombatStats, Proficiency, ABILITY_MAX, ABILITY_MIN};
