//! Character entity - reusable templates and generated NPC instances

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{
    AbilityScores, AlignmentId, CharacterId, ClassId, CombatStats, RaceId, UserId,
};

/// A character row: either a library template (`is_template`, no owner,
/// no `template_id`) or a generated instance (owned, back-referencing the
/// template it was cloned from).
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Store-assigned id; `None` until the row is persisted
    pub id: Option<CharacterId>,
    /// Owning user; `None` marks a library template (or anonymous owner)
    pub user_id: Option<UserId>,
    pub name: String,
    pub gender: Option<String>,
    pub hints: Option<String>,
    pub backstory: Option<String>,
    pub plot_hook: Option<String>,

    pub race_id: RaceId,
    /// Read-side name, populated on load when the lookup row exists
    pub race_name: Option<String>,
    pub class_id: ClassId,
    pub class_name: Option<String>,
    pub alignment_id: AlignmentId,
    pub alignment_name: Option<String>,

    /// Template this instance was generated from; `None` for templates
    pub template_id: Option<CharacterId>,
    pub template_name: Option<String>,

    pub level: i32,
    pub abilities: AbilityScores,
    pub combat: CombatStats,

    pub is_template: bool,
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// True when the template/instance linkage fields are mutually
    /// consistent: templates carry no back-reference, instances always do.
    pub fn linkage_is_consistent(&self) -> bool {
        if self.is_template {
            self.template_id.is_none()
        } else {
            self.template_id.is_some()
        }
    }
}
