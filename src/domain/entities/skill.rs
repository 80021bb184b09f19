//! Skill entity - shared skill library rows, deduplicated by name

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SkillId;

/// A persisted skill row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
}

/// Skill columns for creation; the name alone is the dedup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProperties {
    pub name: String,
    pub description: String,
}

impl SkillProperties {
    pub fn into_skill(self, id: SkillId) -> Skill {
        Skill {
            id,
            name: self.name,
            description: self.description,
        }
    }
}
