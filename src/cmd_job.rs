//! Job subcommand handlers for CRM Jobs.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crm_jobs_config::Config;
use crm_jobs_scheduler::{
    queue_name, EntityStore, JobRecord, JobSchedulerFactory, MemoryEntityStore,
    SqliteEntityStore, SystemClock,
};

use crate::builtin_jobs::build_registry;

/// Parameters of the `schedule` command.
pub(crate) struct ScheduleArgs {
    pub class_name: String,
    pub queue: Option<String>,
    pub group: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub delay_secs: Option<i64>,
    pub data: Option<String>,
}

/// Open the configured record store.
pub(crate) async fn open_store(
    config: &Config,
) -> Result<Arc<dyn EntityStore>, Box<dyn std::error::Error>> {
    match config.store.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryEntityStore::new())),
        _ => {
            if let Some(parent) = config.store.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = SqliteEntityStore::open(&config.store.path).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Schedule one job and print the created record.
pub(crate) async fn schedule_job(
    store: Arc<dyn EntityStore>,
    args: ScheduleArgs,
) -> Result<JobRecord, Box<dyn std::error::Error>> {
    if let Some(ref queue) = args.queue {
        if !queue_name::ALL.contains(&queue.as_str()) {
            warn!("Queue '{}' is not one of the standard queues {:?}", queue, queue_name::ALL);
        }
    }

    let data: Option<serde_json::Value> = args
        .data
        .as_deref()
        .map(|data| serde_json::from_str(data))
        .transpose()?;
    let delay = args
        .delay_secs
        .map(|secs| Duration::try_seconds(secs).ok_or("delay is out of range"))
        .transpose()?;

    let factory = JobSchedulerFactory::new(
        store,
        Arc::new(build_registry()?),
        Arc::new(SystemClock),
    );

    let record = factory
        .create()
        .with_class_name(args.class_name)?
        .with_queue(args.queue.as_deref())
        .with_group(args.group.as_deref())
        .with_time(args.time)
        .with_delay(delay)
        .with_data(data)?
        .schedule()
        .await?;

    info!(
        "Scheduled job '{}' as {} for {}",
        record.class_name().unwrap_or_default(),
        record.id(),
        record.execute_time_raw().unwrap_or_default()
    );
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(record)
}

/// Print stored job records.
pub(crate) async fn list_jobs(
    store: Arc<dyn EntityStore>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = store
        .list_entities(JobRecord::ENTITY_TYPE)
        .await?
        .into_iter()
        .map(JobRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            println!(
                "{:<18} {:<24} {:<6} {:<12} {}",
                "ID", "CLASS", "QUEUE", "GROUP", "EXECUTE TIME"
            );
            println!("{}", "-".repeat(84));
            for record in records {
                println!(
                    "{:<18} {:<24} {:<6} {:<12} {}",
                    record.id(),
                    record.class_name().unwrap_or("-"),
                    record.queue().unwrap_or("-"),
                    record.group().unwrap_or("-"),
                    record.execute_time_raw().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Print registered job classes.
pub(crate) fn list_classes() -> Result<(), Box<dyn std::error::Error>> {
    let registry = build_registry()?;
    for name in registry.job_class_names() {
        println!("{}", name);
    }
    Ok(())
}
