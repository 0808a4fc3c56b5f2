//! Job scheduler: builds a job spec and creates the job record.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::SchedulerError;
use crate::job::{ClassLookup, JobResolver};
use crate::job_data::{IntoJobData, JobData};
use crate::record::{field, format_date_time, JobRecord};
use crate::store::{Attributes, EntityStore};

/// Draft parameters of a job, accumulated by [`JobScheduler`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSpec {
    /// Name of a registered job class.
    pub class_name: Option<String>,
    /// Execution lane; `None` is the default lane.
    pub queue: Option<String>,
    /// Serialization group within the queue.
    pub group: Option<String>,
    /// Payload.
    pub data: Option<JobData>,
    /// Explicit execution time; `None` means now.
    pub time: Option<DateTime<Utc>>,
    /// Offset added to the execution time.
    pub delay: Option<Duration>,
}

impl JobSpec {
    /// Execution time: `time`, or the clock's current instant when unset,
    /// plus `delay` if set. The clock is read only when `time` is unset.
    pub fn execute_time(&self, clock: &dyn Clock) -> Result<DateTime<Utc>, SchedulerError> {
        let time = self.time.unwrap_or_else(|| clock.now());

        match self.delay {
            Some(delay) => time
                .checked_add_signed(delay)
                .ok_or(SchedulerError::ExecuteTimeOutOfRange),
            None => Ok(time),
        }
    }
}

/// Creates a job record.
///
/// Configure the job with the `with_*` methods, then call
/// [`schedule`](Self::schedule), which validates the job spec and writes exactly
/// one record. Jobs sharing a queue and a group run one by one in
/// submission order; jobs in the same queue but different groups may run in
/// parallel. That policy is carried by the record and honored by the
/// execution engine.
///
/// A scheduler is single use. `schedule` takes it by value, so it cannot be
/// scheduled twice or reconfigured afterwards:
///
/// ```compile_fail
/// # use std::sync::Arc;
/// # use crm_jobs_scheduler::{FixedClock, JobRegistry, JobScheduler, MemoryEntityStore};
/// # async fn demo() {
/// let scheduler = JobScheduler::new(
///     Arc::new(MemoryEntityStore::new()),
///     Arc::new(JobRegistry::new()),
///     Arc::new(FixedClock::new(chrono::Utc::now())),
/// );
/// let _first = scheduler.schedule().await;
/// let _second = scheduler.schedule().await;
/// # }
/// ```
pub struct JobScheduler {
    store: Arc<dyn EntityStore>,
    resolver: Arc<dyn JobResolver>,
    clock: Arc<dyn Clock>,
    spec: JobSpec,
}

impl JobScheduler {
    /// Create a scheduler with an empty spec.
    pub fn new(
        store: Arc<dyn EntityStore>,
        resolver: Arc<dyn JobResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            resolver,
            clock,
            spec: JobSpec::default(),
        }
    }

    /// The job spec accumulated so far.
    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    /// Set the job class.
    ///
    /// The name must resolve to a registered class that implements `Job`.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Result<Self, SchedulerError> {
        let class_name = class_name.into();

        match self.resolver.lookup(&class_name) {
            ClassLookup::Runnable => {
                self.spec.class_name = Some(class_name);
                Ok(self)
            }
            ClassLookup::NotRunnable => {
                warn!("Class '{}' is not a job", class_name);
                Err(SchedulerError::InvalidJobClass(class_name))
            }
            ClassLookup::Missing => {
                warn!("Class '{}' is not registered", class_name);
                Err(SchedulerError::UnknownJobClass(class_name))
            }
        }
    }

    /// Set the queue, or clear it with `None`.
    pub fn with_queue(mut self, queue: Option<&str>) -> Self {
        self.spec.queue = queue.map(str::to_string);
        self
    }

    /// Set the group, or clear it with `None`. A group requires a queue.
    pub fn with_group(mut self, group: Option<&str>) -> Self {
        self.spec.group = group.map(str::to_string);
        self
    }

    /// Set the execution time, or clear it with `None` to run at schedule time.
    pub fn with_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.spec.time = time;
        self
    }

    /// Set a delay added to the execution time, or clear it with `None`.
    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.spec.delay = delay;
        self
    }

    /// Set the payload from a `JobData` or a mapping.
    pub fn with_data(mut self, data: impl IntoJobData) -> Result<Self, SchedulerError> {
        self.spec.data = Some(data.into_job_data()?);
        Ok(self)
    }

    /// Validate the job spec and create the job record.
    ///
    /// Store failures are returned unchanged; nothing is retried.
    pub async fn schedule(mut self) -> Result<JobRecord, SchedulerError> {
        let class_name = self
            .spec
            .class_name
            .take()
            .ok_or(SchedulerError::MissingClassName)?;

        if self.spec.group.is_some() && self.spec.queue.is_none() {
            return Err(SchedulerError::GroupWithoutQueue);
        }

        let execute_time = self.spec.execute_time(self.clock.as_ref())?;

        let JobSpec {
            queue, group, data, ..
        } = self.spec;
        let data = data.unwrap_or_default();

        debug!(
            "Scheduling job '{}' (queue: {:?}, group: {:?}) at {}",
            class_name, queue, group, execute_time
        );

        let mut attributes = Attributes::new();
        attributes.insert(field::CLASS_NAME.to_string(), Value::String(class_name));
        attributes.insert(field::QUEUE.to_string(), optional_string(queue));
        attributes.insert(field::GROUP.to_string(), optional_string(group));
        attributes.insert(field::TARGET_TYPE.to_string(), optional_string(data.target_type()));
        attributes.insert(field::TARGET_ID.to_string(), optional_string(data.target_id()));
        attributes.insert(field::DATA.to_string(), Value::Object(data.into_raw()));
        attributes.insert(
            field::EXECUTE_TIME.to_string(),
            Value::String(format_date_time(&execute_time)),
        );

        let entity = self
            .store
            .create_entity(JobRecord::ENTITY_TYPE, attributes)
            .await?;

        Ok(JobRecord::try_from(entity)?)
    }
}

fn optional_string(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

/// Hands out a fresh [`JobScheduler`] per scheduling request.
#[derive(Clone)]
pub struct JobSchedulerFactory {
    store: Arc<dyn EntityStore>,
    resolver: Arc<dyn JobResolver>,
    clock: Arc<dyn Clock>,
}

impl JobSchedulerFactory {
    pub fn new(
        store: Arc<dyn EntityStore>,
        resolver: Arc<dyn JobResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            resolver,
            clock,
        }
    }

    /// Create a new scheduler.
    pub fn create(&self) -> JobScheduler {
        JobScheduler::new(self.store.clone(), self.resolver.clone(), self.clock.clone())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
