mod commands;
mod render;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use gather_core::EventKind;
use gather_core::config::Gather;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gather")]
#[command(about = "Browse your activity feed and join events and series")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which kind of entity a command targets
#[derive(Clone, Copy, ValueEnum)]
pub enum Target {
    Event,
    Series,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ongoing and upcoming activities
    Feed {
        /// Include activities you have not joined
        #[arg(long)]
        all: bool,

        /// Evaluate the feed at this instant instead of now (RFC 3339)
        #[arg(long)]
        at: Option<String>,
    },
    /// Join an event or series
    Join { target: Target, id: String },
    /// Leave an event or series
    Quit { target: Target, id: String },
    /// Show an event or series and your role in it
    Show { target: Target, id: String },
    /// Create an event
    NewEvent {
        title: String,

        /// Start date/time (RFC 3339, e.g. "2025-03-20T15:00:00Z")
        #[arg(short, long)]
        start: String,

        /// Duration (e.g. "90m", "2h")
        #[arg(short, long, default_value = "1h")]
        duration: String,

        /// sports, social or activity
        #[arg(short, long, default_value = "activity")]
        kind: EventKind,

        /// Maximum number of participants, owner included
        #[arg(short, long, default_value_t = 10)]
        max: u32,

        #[arg(long)]
        private: bool,

        /// Add the new event to this series
        #[arg(long)]
        series: Option<String>,
    },
    /// Create an empty series
    NewSeries {
        title: String,

        /// Start date/time (RFC 3339)
        #[arg(short, long)]
        start: String,

        /// Maximum number of participants, owner included
        #[arg(short, long, default_value_t = 10)]
        max: u32,

        #[arg(long)]
        private: bool,
    },
    /// Add an event to a series
    Attach { series: String, event: String },
    /// Remove an event from a series
    Detach { series: String, event: String },
    /// Delete a series, keeping its events
    DeleteSeries { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GATHER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gather = Gather::load()?;

    match cli.command {
        Commands::Feed { all, at } => {
            let now = match at {
                Some(s) => parse_instant(&s)?,
                None => Utc::now(),
            };
            commands::feed::run(&gather, now, all).await
        }
        Commands::Join { target, id } => commands::membership::join(&gather, target, &id).await,
        Commands::Quit { target, id } => commands::membership::quit(&gather, target, &id).await,
        Commands::Show { target, id } => commands::show::run(&gather, target, &id).await,
        Commands::NewEvent {
            title,
            start,
            duration,
            kind,
            max,
            private,
            series,
        } => {
            let start = parse_instant(&start)?;
            let duration_minutes = parse_minutes(&duration)?;
            commands::new::event(
                &gather,
                commands::new::NewEvent {
                    title,
                    start,
                    duration_minutes,
                    kind,
                    max,
                    private,
                    series,
                },
            )
            .await
        }
        Commands::NewSeries {
            title,
            start,
            max,
            private,
        } => {
            let start = parse_instant(&start)?;
            commands::new::series(&gather, &title, start, max, private).await
        }
        Commands::Attach { series, event } => {
            commands::series::attach(&gather, &series, &event).await
        }
        Commands::Detach { series, event } => {
            commands::series::detach(&gather, &series, &event).await
        }
        Commands::DeleteSeries { id } => commands::series::delete(&gather, &id).await,
    }
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid date/time '{}'. Expected RFC 3339", s))?;
    Ok(parsed.with_timezone(&Utc))
}

fn parse_minutes(s: &str) -> Result<u32> {
    let duration =
        humantime::parse_duration(s).with_context(|| format!("Invalid duration '{}'", s))?;
    let secs = duration.as_secs();

    if secs == 0 || secs % 60 != 0 {
        anyhow::bail!("Duration must be a positive whole number of minutes, got '{}'", s);
    }
    u32::try_from(secs / 60).with_context(|| format!("Duration '{}' is too long", s))
}
