//! Job payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchedulerError;

/// Payload key naming the entity type a job operates on.
pub const TARGET_TYPE_KEY: &str = "targetType";

/// Payload key naming the entity id a job operates on.
pub const TARGET_ID_KEY: &str = "targetId";

/// Payload passed to a job.
///
/// An open string-keyed mapping. `targetType` and `targetId` are recognized
/// as the business entity the job works on; every other key is carried
/// through to the stored record untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobData {
    raw: Map<String, Value>,
}

impl JobData {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a raw mapping.
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Get a string value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.raw.get(name).and_then(Value::as_str)
    }

    /// Check whether a key is present.
    pub fn has(&self, name: &str) -> bool {
        self.raw.contains_key(name)
    }

    /// Return a copy with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw.insert(name.into(), value.into());
        self
    }

    /// Target entity type, if present.
    pub fn target_type(&self) -> Option<String> {
        self.raw.get(TARGET_TYPE_KEY).and_then(scalar_text)
    }

    /// Target entity id, if present.
    pub fn target_id(&self) -> Option<String> {
        self.raw.get(TARGET_ID_KEY).and_then(scalar_text)
    }

    /// Return a copy with the target type set, or removed when `None`.
    pub fn with_target_type(self, target_type: Option<&str>) -> Self {
        self.with_optional(TARGET_TYPE_KEY, target_type)
    }

    /// Return a copy with the target id set, or removed when `None`.
    pub fn with_target_id(self, target_id: Option<&str>) -> Self {
        self.with_optional(TARGET_ID_KEY, target_id)
    }

    /// The full mapping, target keys included.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Consume the payload and return the full mapping.
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check whether the payload has no keys.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn with_optional(mut self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => {
                self.raw.insert(key.to_string(), Value::String(value.to_string()));
            }
            None => {
                self.raw.remove(key);
            }
        }
        self
    }
}

impl From<Map<String, Value>> for JobData {
    fn from(raw: Map<String, Value>) -> Self {
        Self::from_raw(raw)
    }
}

/// Ids may arrive as numbers; render them the way they would be stored.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion of the accepted payload shapes into [`JobData`].
///
/// A `JobData` passes through; a mapping is wrapped; null means an empty
/// payload. Anything else is rejected with
/// [`SchedulerError::InvalidDataType`].
pub trait IntoJobData {
    fn into_job_data(self) -> Result<JobData, SchedulerError>;
}

impl IntoJobData for JobData {
    fn into_job_data(self) -> Result<JobData, SchedulerError> {
        Ok(self)
    }
}

impl IntoJobData for Map<String, Value> {
    fn into_job_data(self) -> Result<JobData, SchedulerError> {
        Ok(JobData::from_raw(self))
    }
}

impl IntoJobData for HashMap<String, Value> {
    fn into_job_data(self) -> Result<JobData, SchedulerError> {
        Ok(JobData::from_raw(self.into_iter().collect()))
    }
}

impl IntoJobData for Value {
    fn into_job_data(self) -> Result<JobData, SchedulerError> {
        match self {
            Value::Object(raw) => Ok(JobData::from_raw(raw)),
            Value::Null => Ok(JobData::new()),
            other => Err(SchedulerError::InvalidDataType(value_kind(&other).to_string())),
        }
    }
}

impl<T: IntoJobData> IntoJobData for Option<T> {
    fn into_job_data(self) -> Result<JobData, SchedulerError> {
        match self {
            Some(data) => data.into_job_data(),
            None => Ok(JobData::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_fields_from_mapping() {
        let data = json!({"targetType": "Lead", "targetId": "123", "foo": "bar"})
            .into_job_data()
            .unwrap();

        assert_eq!(data.target_type().as_deref(), Some("Lead"));
        assert_eq!(data.target_id().as_deref(), Some("123"));
        assert_eq!(data.get_str("foo"), Some("bar"));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_numeric_target_id() {
        let data = JobData::new().with(TARGET_ID_KEY, 42);
        assert_eq!(data.target_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_non_scalar_target_is_absent() {
        let data = JobData::new()
            .with(TARGET_TYPE_KEY, json!(["Lead"]))
            .with(TARGET_ID_KEY, Value::Null);

        assert!(data.target_type().is_none());
        assert!(data.target_id().is_none());
        assert!(data.has(TARGET_ID_KEY));
    }

    #[test]
    fn test_with_target_setters() {
        let data = JobData::new()
            .with_target_type(Some("Account"))
            .with_target_id(Some("a1"));
        assert_eq!(data.target_type().as_deref(), Some("Account"));
        assert_eq!(data.get_str(TARGET_ID_KEY), Some("a1"));

        let cleared = data.with_target_id(None);
        assert!(!cleared.has(TARGET_ID_KEY));
        assert!(cleared.has(TARGET_TYPE_KEY));
    }

    #[test]
    fn test_null_and_none_give_empty_payload() {
        assert!(Value::Null.into_job_data().unwrap().is_empty());
        assert!(None::<JobData>.into_job_data().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_values() {
        for value in [json!([1, 2]), json!("text"), json!(3), json!(true)] {
            let result = value.into_job_data();
            assert!(matches!(result, Err(SchedulerError::InvalidDataType(_))));
        }
    }

    #[test]
    fn test_hash_map_is_wrapped() {
        let mut map = HashMap::new();
        map.insert("userId".to_string(), json!("u1"));

        let data = map.into_job_data().unwrap();
        assert_eq!(data.get_str("userId"), Some("u1"));
    }

    #[test]
    fn test_job_data_passes_through() {
        let data = JobData::new().with("entityId", "e1");
        let same = data.clone().into_job_data().unwrap();
        assert_eq!(same, data);
    }

    #[test]
    fn test_serializes_as_raw_map() {
        let data = JobData::new().with_target_type(Some("Lead")).with("foo", "bar");
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({"targetType": "Lead", "foo": "bar"}));
    }
}
