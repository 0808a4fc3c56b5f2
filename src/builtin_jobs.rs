//! Jobs shipped with the application.

use async_trait::async_trait;
use tracing::info;

use crm_jobs_scheduler::{Job, JobData, JobError, JobRegistry, RegistryError};

pub(crate) const NOTIFY_ABOUT_ASSIGNMENT: &str = "NotifyAboutAssignment";
pub(crate) const ASSIGNMENT_PROCESSOR: &str = "AssignmentProcessor";

/// Who assigned what to whom.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssignmentNotice {
    pub assigner_user_id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub user_id: String,
}

impl AssignmentNotice {
    fn from_data(data: &JobData) -> Result<Self, JobError> {
        let field = |name: &str| {
            data.get_str(name)
                .map(str::to_string)
                .ok_or_else(|| JobError::InvalidData(format!("'{}' is required", name)))
        };

        Ok(Self {
            assigner_user_id: field("assignerUserId")?,
            entity_id: field("entityId")?,
            entity_type: field("entityType")?,
            user_id: field("userId")?,
        })
    }
}

/// Delivers assignment notifications. Not a job itself.
#[derive(Debug, Default)]
pub(crate) struct AssignmentProcessor;

impl AssignmentProcessor {
    pub fn process(&self, notice: &AssignmentNotice) {
        info!(
            "Notify user {} about {} {} assigned by {}",
            notice.user_id, notice.entity_type, notice.entity_id, notice.assigner_user_id
        );
    }
}

/// Emails a user when a record gets assigned to them.
#[derive(Debug, Default)]
pub(crate) struct NotifyAboutAssignment {
    processor: AssignmentProcessor,
}

#[async_trait]
impl Job for NotifyAboutAssignment {
    async fn run(&self, data: JobData) -> Result<(), JobError> {
        let notice = AssignmentNotice::from_data(&data)?;
        self.processor.process(&notice);
        Ok(())
    }
}

/// Registry with the built-in classes.
pub(crate) fn build_registry() -> Result<JobRegistry, RegistryError> {
    let registry = JobRegistry::new();
    registry.register_job::<NotifyAboutAssignment>(NOTIFY_ABOUT_ASSIGNMENT)?;
    registry.register_class::<AssignmentProcessor>(ASSIGNMENT_PROCESSOR)?;
    Ok(registry)
}
