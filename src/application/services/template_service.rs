//! Template Service - persists reusable character templates
//!
//! A template is the character row (flagged `is_template`) plus its item
//! and skill associations. Items and skills are deduplicated against the
//! shared library, so creating a template may grow the library as a side
//! effect. The whole aggregate is written in one transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use super::ServiceError;
use crate::domain::entities::{Character, ItemProperties, SkillProperties};
use crate::domain::value_objects::{
    AbilityScores, AlignmentId, CharacterId, ClassId, CombatStats, Proficiency, RaceId,
};
use crate::infrastructure::persistence::SqliteRepository;

/// One item carried by the template, with its association proficiency
#[derive(Debug, Clone)]
pub struct TemplateItem {
    pub properties: ItemProperties,
    pub proficiency: Proficiency,
}

/// One skill known by the template, with its association proficiency
#[derive(Debug, Clone)]
pub struct TemplateSkill {
    pub properties: SkillProperties,
    pub proficiency: Proficiency,
}

/// Request to create a new template. Every ability and combat field is
/// required; a missing field is unrepresentable rather than defaulted.
#[derive(Debug, Clone)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub gender: Option<String>,
    pub race_id: RaceId,
    pub class_id: ClassId,
    pub alignment_id: AlignmentId,
    pub level: i32,
    pub abilities: AbilityScores,
    pub combat: CombatStats,
    pub items: Vec<TemplateItem>,
    pub skills: Vec<TemplateSkill>,
}

/// Template service trait defining the use case
#[async_trait]
pub trait TemplateService: Send + Sync {
    /// Create a reusable template and return its id
    async fn create_template(
        &self,
        request: CreateTemplateRequest,
    ) -> Result<CharacterId, ServiceError>;
}

/// Default implementation of TemplateService over the SQLite repository
pub struct TemplateServiceImpl {
    repository: SqliteRepository,
}

impl TemplateServiceImpl {
    pub fn new(repository: SqliteRepository) -> Self {
        Self { repository }
    }

    fn validate_request(request: &CreateTemplateRequest) -> Result<(), ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::validation(
                "name",
                "Template name cannot be empty",
            ));
        }
        if request.name.len() > 255 {
            return Err(ServiceError::validation(
                "name",
                "Template name cannot exceed 255 characters",
            ));
        }

        // Each item attaches at most once per character (association primary
        // key), so a request repeating a dedup key cannot be honored.
        let mut item_keys = HashSet::new();
        for entry in &request.items {
            let key = (
                entry.properties.name.clone(),
                entry.properties.damage.clone(),
                entry.properties.damage_type.clone(),
                entry.properties.item_type.clone(),
                entry.properties.canonical_traits(),
            );
            if !item_keys.insert(key) {
                return Err(ServiceError::validation(
                    "items",
                    format!("Duplicate item in request: {}", entry.properties.name),
                ));
            }
        }

        let mut skill_names = HashSet::new();
        for entry in &request.skills {
            if !skill_names.insert(entry.properties.name.clone()) {
                return Err(ServiceError::validation(
                    "skills",
                    format!("Duplicate skill in request: {}", entry.properties.name),
                ));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TemplateService for TemplateServiceImpl {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_template(
        &self,
        request: CreateTemplateRequest,
    ) -> Result<CharacterId, ServiceError> {
        Self::validate_request(&request)?;

        let characters = self.repository.characters();
        let items = self.repository.items();
        let skills = self.repository.skills();

        // One transaction end to end: dropping it on any early return
        // rolls the whole aggregate back.
        let mut tx = self.repository.begin().await?;

        if characters.template_name_exists(&mut tx, &request.name).await? {
            return Err(ServiceError::validation(
                "name",
                "Template with this name already exists",
            ));
        }

        let character = Character {
            id: None,
            user_id: None,
            name: request.name.clone(),
            gender: request.gender.clone(),
            hints: None,
            backstory: None,
            plot_hook: None,
            race_id: request.race_id,
            race_name: None,
            class_id: request.class_id,
            class_name: None,
            alignment_id: request.alignment_id,
            alignment_name: None,
            template_id: None,
            template_name: None,
            level: request.level,
            abilities: request.abilities,
            combat: request.combat,
            is_template: true,
            created_at: Utc::now(),
        };

        let character_id = characters.insert(&mut tx, &character).await?;

        for entry in &request.items {
            let item = items.find_or_create(&mut tx, &entry.properties).await?;
            characters
                .attach_item(&mut tx, character_id, item.id, entry.proficiency)
                .await?;
        }

        for entry in &request.skills {
            let skill = skills.find_or_create(&mut tx, &entry.properties).await?;
            characters
                .attach_skill(&mut tx, character_id, skill.id, entry.proficiency)
                .await?;
        }

        tx.commit().await?;

        info!(
            template_id = %character_id,
            items = request.items.len(),
            skills = request.skills.len(),
            "Created template: {}",
            request.name
        );
        Ok(character_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            gender: None,
            race_id: RaceId::from_i64(1),
            class_id: ClassId::from_i64(1),
            alignment_id: AlignmentId::from_i64(1),
            level: 1,
            abilities: AbilityScores {
                strength: 10,
                dexterity: 10,
                constitution: 10,
                intelligence: 10,
                wisdom: 10,
                charisma: 10,
                perception: 10,
            },
            combat: CombatStats {
                armor_class: 10,
                hit_points: 8,
                speed: 30,
                fortitude_save: 0,
                reflex_save: 0,
                will_save: 0,
            },
            items: vec![],
            skills: vec![],
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = TemplateServiceImpl::validate_request(&request("   ")).unwrap_err();
        match err {
            ServiceError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn reasonable_name_passes_validation() {
        assert!(TemplateServiceImpl::validate_request(&request("Goblin")).is_ok());
    }

    #[test]
    fn repeated_item_dedup_key_is_rejected() {
        let dagger = |traits: Vec<String>| TemplateItem {
            properties: ItemProperties {
                name: "Dagger".into(),
                item_type: "weapon".into(),
                damage: "1d4".into(),
                damage_type: "piercing".into(),
                traits,
            },
            proficiency: Proficiency::new(1),
        };

        let mut req = request("Goblin");
        // Same key despite the trait order differing.
        req.items = vec![
            dagger(vec!["agile".into(), "finesse".into()]),
            dagger(vec!["finesse".into(), "agile".into()]),
        ];

        let err = TemplateServiceImpl::validate_request(&req).unwrap_err();
        match err {
            ServiceError::Validation { field, .. } => assert_eq!(field, "items"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn repeated_skill_name_is_rejected() {
        let stealth = || TemplateSkill {
            properties: SkillProperties {
                name: "Stealth".into(),
                description: "Move unseen".into(),
            },
            proficiency: Proficiency::new(2),
        };

        let mut req = request("Goblin");
        req.skills = vec![stealth(), stealth()];

        let err = TemplateServiceImpl::validate_request(&req).unwrap_err();
        match err {
            ServiceError::Validation { field, .. } => assert_eq!(field, "skills"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = TemplateServiceImpl::validate_request(&request(&"g".repeat(256))).unwrap_err();
        match err {
            ServiceError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
