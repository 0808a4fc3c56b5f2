//! SQLite record store.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{Attributes, Entity, EntityStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    attributes TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    UNIQUE (entity_type, id)
);

CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(entity_type, seq);
"#;

/// Raw column values of an `entities` row.
type EntityRow = (String, String, String, String);

/// SQLite-based record store.
///
/// Attributes are kept as a JSON document per row; `seq` preserves
/// insertion order.
pub struct SqliteEntityStore {
    conn: Connection,
}

impl SqliteEntityStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::init(conn).await
    }

    /// Open or create a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(path.clone())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!("SqliteEntityStore opened at {:?}", path);
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(conn.execute_batch(SCHEMA)?))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(Self { conn })
    }
}

fn entity_from_row(row: EntityRow) -> Result<Entity, StoreError> {
    let (id, entity_type, attributes, created_at) = row;

    let attributes: Attributes = serde_json::from_str(&attributes)
        .map_err(|e| StoreError::Serialization(format!("record '{}': {}", id, e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::Serialization(format!("record '{}': {}", id, e)))?
        .with_timezone(&Utc);

    Ok(Entity {
        id,
        entity_type,
        attributes,
        created_at,
    })
}

#[async_trait]
impl EntityStore for SqliteEntityStore {
    async fn create_entity(
        &self,
        entity_type: &str,
        attributes: Attributes,
    ) -> Result<Entity, StoreError> {
        let entity = Entity::new(entity_type, attributes);
        let attributes_json = serde_json::to_string(&entity.attributes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let id = entity.id.clone();
        let entity_type = entity.entity_type.clone();
        let created_at = entity.created_at.to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO entities (id, entity_type, attributes, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, entity_type, attributes_json, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!("Created {} record '{}'", entity.entity_type, entity.id);
        Ok(entity)
    }

    async fn get_entity(&self, entity_type: &str, id: &str) -> Result<Option<Entity>, StoreError> {
        let entity_type = entity_type.to_string();
        let id = id.to_string();

        let row = self
            .conn
            .call(move |conn| {
                let row: Option<EntityRow> = conn
                    .query_row(
                        "SELECT id, entity_type, attributes, created_at
                         FROM entities WHERE entity_type = ?1 AND id = ?2",
                        params![entity_type, id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        row.map(entity_from_row).transpose()
    }

    async fn list_entities(&self, entity_type: &str) -> Result<Vec<Entity>, StoreError> {
        let entity_type = entity_type.to_string();

        let rows: Vec<EntityRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, entity_type, attributes, created_at
                     FROM entities WHERE entity_type = ?1 ORDER BY seq",
                )?;
                let rows = stmt
                    .query_map([&entity_type], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    })?
                    .collect::<Result<Vec<EntityRow>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.into_iter().map(entity_from_row).collect()
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
