//! # CRM Jobs Scheduler
//!
//! Creates deferred job records for the CRM's job runner.
//!
//! ## Features
//!
//! - Fluent, single-use [`JobScheduler`] that validates a job spec
//! - Class-name validation against a [`JobRegistry`] at schedule time
//! - Queue/group serialization policy carried on each record
//! - Execute time from an explicit time or an injected [`Clock`], plus delay
//! - Record persistence (in-memory and SQLite)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use crm_jobs_scheduler::{
//!     queue_name, Job, JobData, JobError, JobRegistry, JobScheduler, MemoryEntityStore,
//!     SystemClock,
//! };
//!
//! struct ProcessLead;
//!
//! #[async_trait]
//! impl Job for ProcessLead {
//!     async fn run(&self, _data: JobData) -> Result<(), JobError> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = JobRegistry::new();
//! registry.register_job::<ProcessLead>("ProcessLead")?;
//!
//! let record = JobScheduler::new(
//!     Arc::new(MemoryEntityStore::new()),
//!     Arc::new(registry),
//!     Arc::new(SystemClock),
//! )
//! .with_class_name("ProcessLead")?
//! .with_queue(Some(queue_name::Q1))
//! .with_group(Some("lead-123"))
//! .with_data(serde_json::json!({"targetType": "Lead", "targetId": "123"}))?
//! .with_delay(Some(chrono::Duration::minutes(10)))
//! .schedule()
//! .await?;
//!
//! println!("created job {}", record.id());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod job;
pub mod job_data;
pub mod queue_name;
pub mod record;
pub mod scheduler;
pub mod sqlite;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{JobError, RegistryError, SchedulerError, StoreError};
pub use job::{ClassLookup, Job, JobRegistry, JobResolver};
pub use job_data::{IntoJobData, JobData};
pub use record::JobRecord;
pub use scheduler::{JobScheduler, JobSchedulerFactory, JobSpec};
pub use sqlite::SqliteEntityStore;
pub use store::{Attributes, Entity, EntityStore, MemoryEntityStore};
