//! CLI definitions for CRM Jobs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// CRM Jobs CLI.
#[derive(Parser)]
#[command(name = "crm-jobs")]
#[command(about = "Schedule deferred CRM jobs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/jobs.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Schedule a job
    Schedule {
        /// Registered job class name
        #[arg(long = "class")]
        class_name: String,

        /// Queue to run the job in
        #[arg(long)]
        queue: Option<String>,

        /// Group within the queue; jobs of one group run one by one
        #[arg(long)]
        group: Option<String>,

        /// Execution time (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,

        /// Delay in seconds added to the execution time
        #[arg(long)]
        delay_secs: Option<i64>,

        /// Job payload as a JSON object
        #[arg(long)]
        data: Option<String>,
    },

    /// List scheduled jobs
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List registered job classes
    Classes,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_time_normalizes_to_utc() {
        let parsed = parse_time("2021-05-10T14:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_other_formats() {
        assert!(parse_time("2021-05-10 12:00:00").is_err());
    }

    #[test]
    fn test_parse_schedule_command() {
        let cli = Cli::try_parse_from([
            "crm-jobs",
            "schedule",
            "--class",
            "NotifyAboutAssignment",
            "--queue",
            "q0",
            "--group",
            "user-1",
            "--delay-secs",
            "60",
            "--data",
            r#"{"userId":"u1"}"#,
        ])
        .unwrap();

        match cli.command {
            Commands::Schedule {
                class_name,
                queue,
                group,
                time,
                delay_secs,
                data,
            } => {
                assert_eq!(class_name, "NotifyAboutAssignment");
                assert_eq!(queue.as_deref(), Some("q0"));
                assert_eq!(group.as_deref(), Some("user-1"));
                assert!(time.is_none());
                assert_eq!(delay_secs, Some(60));
                assert_eq!(data.as_deref(), Some(r#"{"userId":"u1"}"#));
            }
            _ => panic!("expected schedule command"),
        }
    }
}
