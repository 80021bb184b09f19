//! Item repository for SQLite
//!
//! Items are a shared library: the full property tuple is the dedup key,
//! enforced by a UNIQUE constraint. A unique violation on insert means a
//! concurrent creator won the race, so the existing row is reloaded and
//! reused instead of surfacing a failure.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::entities::{Item, ItemProperties};
use crate::domain::value_objects::ItemId;

/// Repository for item library rows
pub struct ItemRepository;

impl ItemRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new item row and return the row id
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        properties: &ItemProperties,
    ) -> Result<ItemId, sqlx::Error> {
        let traits_json = encode_traits(properties)?;
        let row = sqlx::query(
            "INSERT INTO item (name, item_type, damage, damage_type, traits)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
        )
        .bind(&properties.name)
        .bind(&properties.item_type)
        .bind(&properties.damage)
        .bind(&properties.damage_type)
        .bind(&traits_json)
        .fetch_one(&mut *conn)
        .await?;

        let id = ItemId::from_i64(row.try_get("id")?);
        tracing::debug!(item_id = %id, "Inserted item: {}", properties.name);
        Ok(id)
    }

    /// Look up an item by its dedup key. Absence is not an error.
    pub async fn find_by_properties(
        &self,
        conn: &mut SqliteConnection,
        properties: &ItemProperties,
    ) -> Result<Option<Item>, sqlx::Error> {
        let traits_json = encode_traits(properties)?;
        let row = sqlx::query(
            "SELECT id, name, item_type, damage, damage_type, traits
             FROM item
             WHERE name = ?1
               AND damage = ?2
               AND damage_type = ?3
               AND item_type = ?4
               AND traits = ?5",
        )
        .bind(&properties.name)
        .bind(&properties.damage)
        .bind(&properties.damage_type)
        .bind(&properties.item_type)
        .bind(&traits_json)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    /// Reuse the existing row for this dedup key, or create one. Losing an
    /// insert race to a concurrent creator resolves to their row.
    pub async fn find_or_create(
        &self,
        conn: &mut SqliteConnection,
        properties: &ItemProperties,
    ) -> Result<Item, sqlx::Error> {
        if let Some(existing) = self.find_by_properties(conn, properties).await? {
            return Ok(existing);
        }
        self.insert_or_reuse(conn, properties).await
    }

    /// Insert, resolving a unique violation to the row that won the race.
    /// Reached when the row appeared between the lookup and the insert.
    async fn insert_or_reuse(
        &self,
        conn: &mut SqliteConnection,
        properties: &ItemProperties,
    ) -> Result<Item, sqlx::Error> {
        match self.insert(conn, properties).await {
            Ok(id) => Ok(properties.clone().into_item(id)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => self
                .find_by_properties(conn, properties)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
            Err(e) => Err(e),
        }
    }
}

impl Default for ItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_traits(properties: &ItemProperties) -> Result<String, sqlx::Error> {
    serde_json::to_string(&properties.canonical_traits())
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(super) fn row_to_item(row: &SqliteRow) -> Result<Item, sqlx::Error> {
    let traits_json: String = row.try_get("traits")?;
    let traits = serde_json::from_str(&traits_json).map_err(|e| sqlx::Error::ColumnDecode {
        index: "traits".into(),
        source: Box::new(e),
    })?;

    Ok(Item {
        id: ItemId::from_i64(row.try_get("id")?),
        name: row.try_get("name")?,
        item_type: row.try_get("item_type")?,
        damage: row.try_get("damage")?,
        damage_type: row.try_get("damage_type")?,
        traits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::Database;

    fn dagger() -> ItemProperties {
        ItemProperties {
            name: "Dagger".into(),
            item_type: "weapon".into(),
            damage: "1d4".into(),
            damage_type: "piercing".into(),
            traits: vec!["agile".into(), "finesse".into()],
        }
    }

    #[tokio::test]
    async fn losing_the_insert_race_reuses_the_existing_row() {
        let database = Database::in_memory().await.expect("database");
        let mut conn = database.pool().acquire().await.expect("connection");
        let repository = ItemRepository::new();

        // A concurrent creator commits the row after our lookup missed it.
        let winner = repository
            .insert(&mut conn, &dagger())
            .await
            .expect("winning insert");

        let item = repository
            .insert_or_reuse(&mut conn, &dagger())
            .await
            .expect("recover from unique violation");
        assert_eq!(item.id, winner);
        assert_eq!(item.name, "Dagger");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item")
            .fetch_one(&mut *conn)
            .await
            .expect("count");
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn insert_or_reuse_creates_when_no_row_exists() {
        let database = Database::in_memory().await.expect("database");
        let mut conn = database.pool().acquire().await.expect("connection");
        let repository = ItemRepository::new();

        let item = repository
            .insert_or_reuse(&mut conn, &dagger())
            .await
            .expect("create");
        let reloaded = repository
            .find_by_properties(&mut conn, &dagger())
            .await
            .expect("lookup")
            .expect("row exists");
        assert_eq!(item, reloaded);
    }
}
