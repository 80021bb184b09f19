//! Character repository for SQLite
//!
//! All methods run against a caller-supplied connection so that a service
//! can compose several calls inside one transaction. No method commits.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use super::item_repository::row_to_item;
use crate::domain::aggregates::{CharacterSheet, HeldItem, KnownSkill};
use crate::domain::entities::{Character, Skill};
use crate::domain::value_objects::{
    AbilityScores, AlignmentId, CharacterId, ClassId, CombatStats, ItemId, Proficiency, RaceId,
    SkillId, UserId,
};

/// Repository for character rows and their item/skill associations
pub struct CharacterRepository;

impl CharacterRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert the scalar columns of a character and return the row id
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        character: &Character,
    ) -> Result<CharacterId, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO character (
                user_id, name, gender, hints, backstory, plot_hook,
                race_id, class_id, alignment_id, template_id, level,
                strength, dexterity, constitution, intelligence, wisdom, charisma, perception,
                armor_class, hit_points, speed, fortitude_save, reflex_save, will_save,
                is_template, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18,
                ?19, ?20, ?21, ?22, ?23, ?24,
                ?25, ?26
            ) RETURNING id",
        )
        .bind(character.user_id.map(|id| id.as_i64()))
        .bind(&character.name)
        .bind(&character.gender)
        .bind(&character.hints)
        .bind(&character.backstory)
        .bind(&character.plot_hook)
        .bind(character.race_id.as_i64())
        .bind(character.class_id.as_i64())
        .bind(character.alignment_id.as_i64())
        .bind(character.template_id.map(|id| id.as_i64()))
        .bind(character.level)
        .bind(character.abilities.strength)
        .bind(character.abilities.dexterity)
        .bind(character.abilities.constitution)
        .bind(character.abilities.intelligence)
        .bind(character.abilities.wisdom)
        .bind(character.abilities.charisma)
        .bind(character.abilities.perception)
        .bind(character.combat.armor_class)
        .bind(character.combat.hit_points)
        .bind(character.combat.speed)
        .bind(character.combat.fortitude_save)
        .bind(character.combat.reflex_save)
        .bind(character.combat.will_save)
        .bind(character.is_template)
        .bind(character.created_at)
        .fetch_one(&mut *conn)
        .await?;

        let id = CharacterId::from_i64(row.try_get("id")?);
        tracing::debug!(character_id = %id, "Inserted character: {}", character.name);
        Ok(id)
    }

    /// True when a template (not a generated instance) already uses `name`
    pub async fn template_name_exists(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM character WHERE name = ?1 AND is_template = 1",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count > 0)
    }

    /// Insert one character/item association row
    pub async fn attach_item(
        &self,
        conn: &mut SqliteConnection,
        character_id: CharacterId,
        item_id: ItemId,
        proficiency: Proficiency,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO character_item (character_id, item_id, proficiency) VALUES (?1, ?2, ?3)",
        )
        .bind(character_id.as_i64())
        .bind(item_id.as_i64())
        .bind(proficiency.rank())
        .execute(&mut *conn)
        .await?;
        tracing::debug!(%character_id, %item_id, %proficiency, "Attached item to character");
        Ok(())
    }

    /// Insert one character/skill association row
    pub async fn attach_skill(
        &self,
        conn: &mut SqliteConnection,
        character_id: CharacterId,
        skill_id: SkillId,
        proficiency: Proficiency,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO character_skill (character_id, skill_id, proficiency) VALUES (?1, ?2, ?3)",
        )
        .bind(character_id.as_i64())
        .bind(skill_id.as_i64())
        .bind(proficiency.rank())
        .execute(&mut *conn)
        .await?;
        tracing::debug!(%character_id, %skill_id, %proficiency, "Attached skill to character");
        Ok(())
    }

    /// Load a character plus its associations when the flags request them.
    /// Returns `None` when the id does not exist; absence is not an error.
    pub async fn get_sheet(
        &self,
        conn: &mut SqliteConnection,
        id: CharacterId,
        include_items: bool,
        include_skills: bool,
    ) -> Result<Option<CharacterSheet>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT c.*,
                    r.name AS race_name,
                    cl.name AS class_name,
                    a.name AS alignment_name,
                    t.name AS template_name
             FROM character c
             LEFT JOIN race r ON r.id = c.race_id
             LEFT JOIN class cl ON cl.id = c.class_id
             LEFT JOIN alignment a ON a.id = c.alignment_id
             LEFT JOIN character t ON t.id = c.template_id
             WHERE c.id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let character = row_to_character(&row)?;

        let items = if include_items {
            self.load_held_items(conn, id).await?
        } else {
            Vec::new()
        };
        let skills = if include_skills {
            self.load_known_skills(conn, id).await?
        } else {
            Vec::new()
        };

        Ok(Some(CharacterSheet {
            character,
            items,
            skills,
        }))
    }

    /// Insert a full sheet: the character row plus one association row per
    /// carried item and skill, each preserving its proficiency. Runs on the
    /// caller's transaction, so a failure anywhere rolls back everything.
    pub async fn insert_sheet(
        &self,
        conn: &mut SqliteConnection,
        sheet: &CharacterSheet,
    ) -> Result<CharacterId, sqlx::Error> {
        let character_id = self.insert(conn, &sheet.character).await?;

        for held in &sheet.items {
            self.attach_item(conn, character_id, held.item.id, held.proficiency)
                .await?;
        }
        for known in &sheet.skills {
            self.attach_skill(conn, character_id, known.skill.id, known.proficiency)
                .await?;
        }

        Ok(character_id)
    }

    async fn load_held_items(
        &self,
        conn: &mut SqliteConnection,
        character_id: CharacterId,
    ) -> Result<Vec<HeldItem>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT i.id, i.name, i.item_type, i.damage, i.damage_type, i.traits,
                    ci.proficiency
             FROM item i
             INNER JOIN character_item ci ON ci.item_id = i.id
             WHERE ci.character_id = ?1
             ORDER BY i.id",
        )
        .bind(character_id.as_i64())
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(HeldItem {
                    item: row_to_item(row)?,
                    proficiency: Proficiency::new(row.try_get("proficiency")?),
                })
            })
            .collect()
    }

    async fn load_known_skills(
        &self,
        conn: &mut SqliteConnection,
        character_id: CharacterId,
    ) -> Result<Vec<KnownSkill>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT s.id, s.name, s.description, cs.proficiency
             FROM skill s
             INNER JOIN character_skill cs ON cs.skill_id = s.id
             WHERE cs.character_id = ?1
             ORDER BY s.id",
        )
        .bind(character_id.as_i64())
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(KnownSkill {
                    skill: Skill {
                        id: SkillId::from_i64(row.try_get("id")?),
                        name: row.try_get("name")?,
                        description: row.try_get("description")?,
                    },
                    proficiency: Proficiency::new(row.try_get("proficiency")?),
                })
            })
            .collect()
    }
}

impl Default for CharacterRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character, sqlx::Error> {
    Ok(Character {
        id: Some(CharacterId::from_i64(row.try_get("id")?)),
        user_id: row
            .try_get::<Option<i64>, _>("user_id")?
            .map(UserId::from_i64),
        name: row.try_get("name")?,
        gender: row.try_get("gender")?,
        hints: row.try_get("hints")?,
        backstory: row.try_get("backstory")?,
        plot_hook: row.try_get("plot_hook")?,
        race_id: RaceId::from_i64(row.try_get("race_id")?),
        race_name: row.try_get("race_name")?,
        class_id: ClassId::from_i64(row.try_get("class_id")?),
        class_name: row.try_get("class_name")?,
        alignment_id: AlignmentId::from_i64(row.try_get("alignment_id")?),
        alignment_name: row.try_get("alignment_name")?,
        template_id: row
            .try_get::<Option<i64>, _>("template_id")?
            .map(CharacterId::from_i64),
        template_name: row.try_get("template_name")?,
        level: row.try_get("level")?,
        abilities: AbilityScores {
            strength: row.try_get("strength")?,
            dexterity: row.try_get("dexterity")?,
            constitution: row.try_get("constitution")?,
            intelligence: row.try_get("intelligence")?,
            wisdom: row.try_get("wisdom")?,
            charisma: row.try_get("charisma")?,
            perception: row.try_get("perception")?,
        },
        combat: CombatStats {
            armor_class: row.try_get("armor_class")?,
            hit_points: row.try_get("hit_points")?,
            speed: row.try_get("speed")?,
            fortitude_save: row.try_get("fortitude_save")?,
            reflex_save: row.try_get("reflex_save")?,
            will_save: row.try_get("will_save")?,
        },
        is_template: row.try_get("is_template")?,
        created_at: row.try_get("created_at")?,
    })
}
