//! Skill repository for SQLite
//!
//! Skills are deduplicated by name alone (UNIQUE constraint); the same
//! reload-on-unique-violation rule as items applies to insert races.

use sqlx::{Row, SqliteConnection};

use crate::domain::entities::{Skill, SkillProperties};
use crate::domain::value_objects::SkillId;

/// Repository for skill library rows
pub struct SkillRepository;

impl SkillRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new skill row and return the row id
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        properties: &SkillProperties,
    ) -> Result<SkillId, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO skill (name, description) VALUES (?1, ?2) RETURNING id",
        )
        .bind(&properties.name)
        .bind(&properties.description)
        .fetch_one(&mut *conn)
        .await?;

        let id = SkillId::from_i64(row.try_get("id")?);
        tracing::debug!(skill_id = %id, "Inserted skill: {}", properties.name);
        Ok(id)
    }

    /// Look up a skill by name. Absence is not an error.
    pub async fn find_by_name(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, description FROM skill WHERE name = ?1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(|row| {
            Ok(Skill {
                id: SkillId::from_i64(row.try_get("id")?),
                name: row.try_get("name")?,
                description: row.try_get("description")?,
            })
        })
        .transpose()
    }

    /// Reuse the existing row for this name, or create one. Losing an
    /// insert race to a concurrent creator resolves to their row.
    pub async fn find_or_create(
        &self,
        conn: &mut SqliteConnection,
        properties: &SkillProperties,
    ) -> Result<Skill, sqlx::Error> {
        if let Some(existing) = self.find_by_name(conn, &properties.name).await? {
            return Ok(existing);
        }
        self.insert_or_reuse(conn, properties).await
    }

    /// Insert, resolving a unique violation to the row that won the race.
    /// Reached when the row appeared between the lookup and the insert.
    async fn insert_or_reuse(
        &self,
        conn: &mut SqliteConnection,
        properties: &SkillProperties,
    ) -> Result<Skill, sqlx::Error> {
        match self.insert(conn, properties).await {
            Ok(id) => Ok(properties.clone().into_skill(id)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => self
                .find_by_name(conn, &properties.name)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
            Err(e) => Err(e),
        }
    }
}

impl Default for SkillRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::Database;

    fn stealth() -> SkillProperties {
        SkillProperties {
            name: "Stealth".into(),
            description: "Move unseen and unheard".into(),
        }
    }

    #[tokio::test]
    async fn losing_the_insert_race_reuses_the_existing_row() {
        let database = Database::in_memory().await.expect("database");
        let mut conn = database.pool().acquire().await.expect("connection");
        let repository = SkillRepository::new();

        // A concurrent creator commits the row after our lookup missed it.
        let winner = repository
            .insert(&mut conn, &stealth())
            .await
            .expect("winning insert");

        let skill = repository
            .insert_or_reuse(&mut conn, &stealth())
            .await
            .expect("recover from unique violation");
        assert_eq!(skill.id, winner);
        assert_eq!(skill.name, "Stealth");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skill")
            .fetch_one(&mut *conn)
            .await
            .expect("count");
        assert_eq!(rows, 1);
    }
}
