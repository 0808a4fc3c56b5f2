//! Stored job record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::job_data::JobData;
use crate::store::Entity;

/// Date-time layout used for stored timestamps, always UTC.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Attribute names of a job record.
pub mod field {
    pub const CLASS_NAME: &str = "className";
    pub const QUEUE: &str = "queue";
    pub const GROUP: &str = "group";
    pub const TARGET_TYPE: &str = "targetType";
    pub const TARGET_ID: &str = "targetId";
    pub const DATA: &str = "data";
    pub const EXECUTE_TIME: &str = "executeTime";
}

/// Render an instant in [`DATE_TIME_FORMAT`].
pub fn format_date_time(time: &DateTime<Utc>) -> String {
    time.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a [`DATE_TIME_FORMAT`] string as UTC.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// A job record as handed back by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobRecord {
    entity: Entity,
}

impl JobRecord {
    /// Logical record type of jobs.
    pub const ENTITY_TYPE: &'static str = "Job";

    /// Id assigned by the store.
    pub fn id(&self) -> &str {
        &self.entity.id
    }

    pub fn class_name(&self) -> Option<&str> {
        self.entity.get_str(field::CLASS_NAME)
    }

    pub fn queue(&self) -> Option<&str> {
        self.entity.get_str(field::QUEUE)
    }

    pub fn group(&self) -> Option<&str> {
        self.entity.get_str(field::GROUP)
    }

    pub fn target_type(&self) -> Option<&str> {
        self.entity.get_str(field::TARGET_TYPE)
    }

    pub fn target_id(&self) -> Option<&str> {
        self.entity.get_str(field::TARGET_ID)
    }

    /// Stored payload; empty if the record carries none.
    pub fn data(&self) -> JobData {
        match self.entity.get(field::DATA) {
            Some(Value::Object(raw)) => JobData::from_raw(raw.clone()),
            _ => JobData::new(),
        }
    }

    /// Execute time exactly as stored.
    pub fn execute_time_raw(&self) -> Option<&str> {
        self.entity.get_str(field::EXECUTE_TIME)
    }

    /// Execute time parsed back into an instant.
    pub fn execute_time(&self) -> Option<DateTime<Utc>> {
        self.execute_time_raw().and_then(parse_date_time)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.entity.created_at
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }
}

impl TryFrom<Entity> for JobRecord {
    type Error = StoreError;

    fn try_from(entity: Entity) -> Result<Self, Self::Error> {
        if entity.entity_type != Self::ENTITY_TYPE {
            return Err(StoreError::UnexpectedEntityType {
                expected: Self::ENTITY_TYPE.to_string(),
                actual: entity.entity_type,
            });
        }

        Ok(Self { entity })
    }
}
