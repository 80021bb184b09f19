//! Character sheet aggregate - a character plus its item and skill
//! associations, treated as one consistency unit

use chrono::Utc;

use crate::domain::entities::{Character, Item, Skill};
use crate::domain::value_objects::{AlignmentId, CharacterId, ClassId, Proficiency, RaceId, UserId};

/// One item held by a character, with the association-scoped proficiency
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItem {
    pub item: Item,
    pub proficiency: Proficiency,
}

/// One skill known by a character, with the association-scoped proficiency
#[derive(Debug, Clone, PartialEq)]
pub struct KnownSkill {
    pub skill: Skill,
    pub proficiency: Proficiency,
}

/// The aggregate: character row plus association lists
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSheet {
    pub character: Character,
    pub items: Vec<HeldItem>,
    pub skills: Vec<KnownSkill>,
}

/// Instantiation-time choices applied to a fresh copy of a template;
/// these are not inherited verbatim from the template.
#[derive(Debug, Clone)]
pub struct InstantiationOverrides {
    pub user_id: Option<UserId>,
    pub race_id: RaceId,
    pub class_id: ClassId,
    pub alignment_id: AlignmentId,
    pub hints: Option<String>,
}

impl CharacterSheet {
    /// Explicit deep copy of a loaded template sheet into a fresh,
    /// independent instance. Every nested value is rebuilt field by field,
    /// so mutating the result can never reach back into the template.
    ///
    /// The copy starts unsaved (`id` cleared), is marked as a non-template,
    /// and back-references the source template. Items and skills keep their
    /// library identity and association proficiency; only the association
    /// list itself is new.
    pub fn instantiate(&self, overrides: &InstantiationOverrides) -> CharacterSheet {
        let source = &self.character;

        let character = Character {
            id: None,
            user_id: overrides.user_id,
            name: source.name.clone(),
            gender: source.gender.clone(),
            hints: overrides.hints.clone(),
            backstory: source.backstory.clone(),
            plot_hook: source.plot_hook.clone(),
            race_id: overrides.race_id,
            race_name: None,
            class_id: overrides.class_id,
            class_name: None,
            alignment_id: overrides.alignment_id,
            alignment_name: None,
            template_id: source.id,
            template_name: None,
            level: source.level,
            abilities: source.abilities,
            combat: source.combat,
            is_template: false,
            created_at: Utc::now(),
        };

        let items = self
            .items
            .iter()
            .map(|held| HeldItem {
                item: Item {
                    id: held.item.id,
                    name: held.item.name.clone(),
                    item_type: held.item.item_type.clone(),
                    damage: held.item.damage.clone(),
                    damage_type: held.item.damage_type.clone(),
                    traits: held.item.traits.clone(),
                },
                proficiency: held.proficiency,
            })
            .collect();

        let skills = self
            .skills
            .iter()
            .map(|known| KnownSkill {
                skill: Skill {
                    id: known.skill.id,
                    name: known.skill.name.clone(),
                    description: known.skill.description.clone(),
                },
                proficiency: known.proficiency,
            })
            .collect();

        CharacterSheet {
            character,
            items,
            skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AbilityScores, CombatStats, ItemId, SkillId};

    fn template_sheet() -> CharacterSheet {
        CharacterSheet {
            character: Character {
                id: Some(CharacterId::from_i64(7)),
                user_id: None,
                name: "Goblin Scout".into(),
                gender: Some("female".into()),
                hints: Some("template hint".into()),
                backstory: Some("Raised in the warrens".into()),
                plot_hook: Some("Knows a secret pass".into()),
                race_id: RaceId::from_i64(1),
                race_name: Some("Goblin".into()),
                class_id: ClassId::from_i64(2),
                class_name: Some("Rogue".into()),
                alignment_id: AlignmentId::from_i64(3),
                alignment_name: Some("Neutral".into()),
                template_id: None,
                template_name: None,
                level: 2,
                abilities: AbilityScores {
                    strength: 8,
                    dexterity: 16,
                    constitution: 10,
                    intelligence: 10,
                    wisdom: 12,
                    charisma: 8,
                    perception: 14,
                },
                combat: CombatStats {
                    armor_class: 14,
                    hit_points: 12,
                    speed: 30,
                    fortitude_save: 1,
                    reflex_save: 4,
                    will_save: 1,
                },
                is_template: true,
                created_at: Utc::now(),
            },
            items: vec![HeldItem {
                item: Item {
                    id: ItemId::from_i64(4),
                    name: "Dagger".into(),
                    item_type: "weapon".into(),
                    damage: "1d4".into(),
                    damage_type: "piercing".into(),
                    traits: vec!["agile".into()],
                },
                proficiency: Proficiency::new(2),
            }],
            skills: vec![KnownSkill {
                skill: Skill {
                    id: SkillId::from_i64(9),
                    name: "Stealth".into(),
                    description: "Move unseen".into(),
                },
                proficiency: Proficiency::new(3),
            }],
        }
    }

    fn overrides() -> InstantiationOverrides {
        InstantiationOverrides {
            user_id: Some(UserId::from_i64(42)),
            race_id: RaceId::from_i64(5),
            class_id: ClassId::from_i64(6),
            alignment_id: AlignmentId::from_i64(7),
            hints: Some("make it sneaky".into()),
        }
    }

    #[test]
    fn instantiate_resets_identity_and_linkage() {
        let template = template_sheet();
        let instance = template.instantiate(&overrides());

        assert_eq!(instance.character.id, None);
        assert!(!instance.character.is_template);
        assert_eq!(instance.character.template_id, template.character.id);
        assert_eq!(instance.character.user_id, Some(UserId::from_i64(42)));
        assert_eq!(instance.character.race_id, RaceId::from_i64(5));
        assert_eq!(instance.character.class_id, ClassId::from_i64(6));
        assert_eq!(instance.character.alignment_id, AlignmentId::from_i64(7));
        assert_eq!(instance.character.hints.as_deref(), Some("make it sneaky"));
        assert!(instance.character.linkage_is_consistent());
    }

    #[test]
    fn instantiate_carries_associations_with_proficiency() {
        let template = template_sheet();
        let instance = template.instantiate(&overrides());

        assert_eq!(instance.items.len(), 1);
        assert_eq!(instance.items[0].item.id, template.items[0].item.id);
        assert_eq!(instance.items[0].proficiency, Proficiency::new(2));
        assert_eq!(instance.skills.len(), 1);
        assert_eq!(instance.skills[0].proficiency, Proficiency::new(3));
    }

    #[test]
    fn mutating_the_instance_leaves_the_template_untouched() {
        let template = template_sheet();
        let before = template.clone();
        let mut instance = template.instantiate(&overrides());

        instance.character.abilities.strength = 18;
        instance.character.name.push_str(" (copy)");
        instance.items[0].item.traits.push("thrown".into());
        instance.items[0].proficiency = Proficiency::new(0);
        instance.skills.clear();

        assert_eq!(template, before);
    }
}
