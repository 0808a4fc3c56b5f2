//! Record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;

/// Named fields of a stored record.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Length of a generated record id.
pub const ENTITY_ID_LENGTH: usize = 17;

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Id assigned by the store.
    pub id: String,
    /// Logical record type, e.g. `Job`.
    pub entity_type: String,
    /// Field values.
    pub attributes: Attributes,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

impl Entity {
    /// Create a record with a fresh id.
    pub fn new(entity_type: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: generate_id(),
            entity_type: entity_type.into(),
            attributes,
            created_at: Utc::now(),
        }
    }

    /// Get an attribute by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Get a string attribute by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(serde_json::Value::as_str)
    }
}

/// Generate a record id: lowercase hex, [`ENTITY_ID_LENGTH`] chars.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ENTITY_ID_LENGTH);
    id
}

/// Durable record storage.
///
/// The scheduler only ever calls [`EntityStore::create_entity`]. Reads are
/// provided for callers that want the stored rows back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Store a new record and return it with its assigned id.
    async fn create_entity(
        &self,
        entity_type: &str,
        attributes: Attributes,
    ) -> Result<Entity, StoreError>;

    /// Load a record by type and id.
    async fn get_entity(&self, entity_type: &str, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Load all records of a type in insertion order.
    async fn list_entities(&self, entity_type: &str) -> Result<Vec<Entity>, StoreError>;
}

/// In-memory record store.
pub struct MemoryEntityStore {
    entities: RwLock<Vec<Entity>>,
}

impl MemoryEntityStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Total number of stored records.
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }
}

impl Default for MemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn create_entity(
        &self,
        entity_type: &str,
        attributes: Attributes,
    ) -> Result<Entity, StoreError> {
        let entity = Entity::new(entity_type, attributes);

        let mut entities = self.entities.write().await;
        entities.push(entity.clone());
        debug!("Created {} record '{}'", entity.entity_type, entity.id);

        Ok(entity)
    }

    async fn get_entity(&self, entity_type: &str, id: &str) -> Result<Option<Entity>, StoreError> {
        let entities = self.entities.read().await;
        Ok(entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.id == id)
            .cloned())
    }

    async fn list_entities(&self, entity_type: &str) -> Result<Vec<Entity>, StoreError> {
        let entities = self.entities.read().await;
        Ok(entities
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .cloned()
            .collect())
    }
}
