//! CRM Jobs - deferred job scheduler
//!
//! Main entry point for the CRM Jobs CLI.

mod builtin_jobs;
mod cli;
mod cmd_job;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crm_jobs_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use cli::{Cli, Commands};
use cmd_job::ScheduleArgs;

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    // Optional file layer with daily rotation
    let file_layer = match logging.directory {
        Some(ref log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("crm-jobs")
                .filename_suffix("log")
                .max_log_files(30)
                .build(log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer alive for the program duration
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // Console output goes to stderr so stdout stays machine-readable
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    let validation = ConfigValidator::ensure_valid(&config)?;

    init_tracing(&config.logging)?;

    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Schedule {
            class_name,
            queue,
            group,
            time,
            delay_secs,
            data,
        } => {
            let store = cmd_job::open_store(&config).await?;
            cmd_job::schedule_job(
                store,
                ScheduleArgs {
                    class_name,
                    queue,
                    group,
                    time,
                    delay_secs,
                    data,
                },
            )
            .await?;
        }
        Commands::List { format } => {
            let store = cmd_job::open_store(&config).await?;
            cmd_job::list_jobs(store, &format).await?;
        }
        Commands::Classes => {
            cmd_job::list_classes()?;
        }
    }

    Ok(())
}
