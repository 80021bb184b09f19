//! Generator Service - one-shot randomized instantiation of templates
//!
//! Loads a template sheet, deep-copies it into an independent instance,
//! applies the modifier policy, and persists the copy. Load and persist
//! share one transaction, so the template is read as a consistent
//! snapshot and a failure anywhere leaves no partial character behind.

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument};

use super::ServiceError;
use crate::domain::aggregates::InstantiationOverrides;
use crate::domain::services::{ModifierPolicy, UniformModifierPolicy};
use crate::domain::value_objects::{AlignmentId, CharacterId, ClassId, RaceId, UserId};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;

/// Instantiation options: which template to clone, the instantiation-time
/// choices that override the template, and an optional RNG seed for
/// reproducible generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_id: CharacterId,
    pub race_id: RaceId,
    pub class_id: ClassId,
    pub alignment_id: AlignmentId,
    pub hints: Option<String>,
    pub seed: Option<u64>,
}

/// Generator service trait defining the use case
#[async_trait]
pub trait GeneratorService: Send + Sync {
    /// Generate a new character from a template and return its id
    async fn generate_character(
        &self,
        options: GenerateOptions,
        user_id: Option<UserId>,
    ) -> Result<CharacterId, ServiceError>;
}

/// Default implementation of GeneratorService over the SQLite repository
pub struct GeneratorServiceImpl {
    repository: SqliteRepository,
    policy: Arc<dyn ModifierPolicy>,
}

impl GeneratorServiceImpl {
    /// Create a generator with the default uniform modifier policy
    pub fn new(repository: SqliteRepository) -> Self {
        Self::with_policy(repository, Arc::new(UniformModifierPolicy::default()))
    }

    /// Create a generator whose uniform modifier spread comes from
    /// configuration (`MODIFIER_SPREAD`)
    pub fn from_config(repository: SqliteRepository, config: &AppConfig) -> Self {
        Self::with_policy(
            repository,
            Arc::new(UniformModifierPolicy::new(config.modifier_spread)),
        )
    }

    pub fn with_policy(repository: SqliteRepository, policy: Arc<dyn ModifierPolicy>) -> Self {
        Self { repository, policy }
    }
}

#[async_trait]
impl GeneratorService for GeneratorServiceImpl {
    #[instrument(skip(self, options), fields(template_id = %options.template_id))]
    async fn generate_character(
        &self,
        options: GenerateOptions,
        user_id: Option<UserId>,
    ) -> Result<CharacterId, ServiceError> {
        let characters = self.repository.characters();

        // One transaction covers the template read and the instance write.
        let mut tx = self.repository.begin().await?;

        let template = characters
            .get_sheet(&mut tx, options.template_id, true, true)
            .await?
            .filter(|sheet| sheet.character.is_template)
            .ok_or_else(|| ServiceError::validation("template_id", "Template not found"))?;

        let mut sheet = template.instantiate(&InstantiationOverrides {
            user_id,
            race_id: options.race_id,
            class_id: options.class_id,
            alignment_id: options.alignment_id,
            hints: options.hints.clone(),
        });

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.policy.apply(
            &mut sheet.character.abilities,
            &mut sheet.character.combat,
            &mut rng,
        );

        let character_id = characters.insert_sheet(&mut tx, &sheet).await?;
        tx.commit().await?;

        info!(
            %character_id,
            template_id = %options.template_id,
            owner = user_id.map(|id| id.as_i64()),
            "Generated character: {}",
            sheet.character.name
        );
        Ok(character_id)
    }
}
