//! Scheduler errors.

use thiserror::Error;

/// Errors raised while building or scheduling a job.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `schedule()` was called before a class name was set.
    #[error("Class name is not set")]
    MissingClassName,

    /// The class name does not resolve to any known type.
    #[error("Class '{0}' does not exist")]
    UnknownJobClass(String),

    /// The class name resolves to a type that is not a job.
    #[error("Class '{0}' does not implement 'Job' interface")]
    InvalidJobClass(String),

    /// A group was set while the queue is absent.
    #[error("A group can't be set without a queue")]
    GroupWithoutQueue,

    /// The payload is neither a mapping nor a `JobData`.
    #[error("Invalid job data type: expected a mapping, got {0}")]
    InvalidDataType(String),

    /// Time plus delay does not fit in the supported date range.
    #[error("Execute time is out of range")]
    ExecuteTimeOutOfRange,

    /// Failure reported by the record store, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open or reach the backing storage.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A read or write statement failed.
    #[error("Query error: {0}")]
    Query(String),

    /// Attributes could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store handed back an entity of another type.
    #[error("Unexpected entity type: expected {expected}, got {actual}")]
    UnexpectedEntityType { expected: String, actual: String },
}

/// Job class registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Class already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Class not found: {0}")]
    NotFound(String),
}

/// Errors returned by a job body.
#[derive(Debug, Error)]
pub enum JobError {
    /// The payload is missing a field or holds the wrong type.
    #[error("Invalid job data: {0}")]
    InvalidData(String),

    /// The job ran and failed.
    #[error("Job failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_class_name_error() {
        let err = SchedulerError::MissingClassName;
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_unknown_and_invalid_class_errors() {
        let unknown = SchedulerError::UnknownJobClass("Foo".to_string());
        assert!(unknown.to_string().contains("'Foo'"));
        assert!(unknown.to_string().contains("does not exist"));

        let invalid = SchedulerError::InvalidJobClass("Bar".to_string());
        assert!(invalid.to_string().contains("'Bar'"));
        assert!(invalid.to_string().contains("'Job'"));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = SchedulerError::from(StoreError::Query("disk I/O error".to_string()));
        assert_eq!(err.to_string(), "Query error: disk I/O error");
        assert!(matches!(err, SchedulerError::Store(StoreError::Query(_))));
    }

    #[test]
    fn test_unexpected_entity_type_error() {
        let err = StoreError::UnexpectedEntityType {
            expected: "Job".to_string(),
            actual: "Lead".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("Job"));
        assert!(display.contains("Lead"));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors: Vec<SchedulerError> = vec![
            SchedulerError::MissingClassName,
            SchedulerError::UnknownJobClass("a".to_string()),
            SchedulerError::InvalidJobClass("b".to_string()),
            SchedulerError::GroupWithoutQueue,
            SchedulerError::InvalidDataType("array".to_string()),
            SchedulerError::ExecuteTimeOutOfRange,
            SchedulerError::Store(StoreError::Connection("c".to_string())),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
