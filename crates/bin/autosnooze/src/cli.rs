//! Command-line interface.

use std::path::{Path, PathBuf};

use anyhow::Context;
use autosnooze_app::countdown;
use autosnooze_app::services::eligibility_service::EligibilityService;
use autosnooze_app::services::snooze_service::SnoozeService;
use autosnooze_domain::automation::AutomationSnapshot;
use autosnooze_domain::countdown::format_countdown;
use autosnooze_domain::duration;
use autosnooze_domain::grouping::Facet;
use autosnooze_domain::id::AutomationId;
use autosnooze_domain::time::{Clock, SystemClock, Timestamp};
use chrono::DateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::sink::JsonLinesSink;
use crate::snapshot;
use crate::state::FileDurationStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Temporarily pause home automations", long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Configuration file (defaults to ./autosnooze.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Parse a duration and print its canonical forms")]
    Parse {
        /// Duration text, e.g. "1h30m", "2.5d" or "45"
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    #[command(about = "Show quick-pick durations and the last used one")]
    Presets,
    #[command(about = "List the automations that may be snoozed")]
    List(ListArgs),
    #[command(about = "Pause automations for a duration or until a time")]
    Pause(PauseArgs),
    #[command(about = "Re-enable paused automations")]
    Wake(WakeArgs),
    #[command(about = "Print the time left until a target, every second")]
    Countdown(CountdownArgs),
}

#[derive(Debug, Args)]
struct SnapshotArgs {
    /// Snapshot file with automations and registries
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    source: SnapshotArgs,
    /// Case-insensitive text matched against names and ids
    #[arg(long, default_value = "")]
    search: String,
    /// Group the list along a facet
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,
}

#[derive(Debug, Args)]
struct PauseArgs {
    #[command(flatten)]
    source: SnapshotArgs,
    /// Automation ids, e.g. automation.porch_light
    #[arg(required = true)]
    ids: Vec<AutomationId>,
    /// How long to pause, e.g. "1h30m"; defaults to the last used duration
    #[arg(long = "for", value_name = "DURATION", conflicts_with = "until")]
    duration: Option<String>,
    /// Re-enable at this RFC 3339 time instead
    #[arg(long)]
    until: Option<Timestamp>,
    /// Disable at this RFC 3339 time rather than now
    #[arg(long, requires = "until")]
    from: Option<Timestamp>,
}

#[derive(Debug, Args)]
struct WakeArgs {
    /// Automation ids to re-enable
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    ids: Vec<AutomationId>,
    /// Re-enable every paused automation
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct CountdownArgs {
    /// RFC 3339 time the countdown ends at
    target: String,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u32>,
    /// Text shown once the target is reached
    #[arg(long, default_value = "Resuming...")]
    expired_label: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupBy {
    Area,
    Category,
    Label,
}

impl From<GroupBy> for Facet {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Area => Facet::Area,
            GroupBy::Category => Facet::Category,
            GroupBy::Label => Facet::Label,
        }
    }
}

impl Cli {
    /// Run the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns any failure with context suitable for display to the user.
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        match self.command {
            Commands::Parse { text } => parse(&text),
            Commands::Presets => presets(config).await,
            Commands::List(args) => list(config, &args),
            Commands::Pause(args) => pause(config, &args).await,
            Commands::Wake(args) => wake(config, args).await,
            Commands::Countdown(args) => run_countdown(&args).await,
        }
    }
}

fn snooze_service(
    config: &Config,
) -> anyhow::Result<SnoozeService<JsonLinesSink<std::io::Stdout>, FileDurationStore>> {
    Ok(SnoozeService::new(
        JsonLinesSink::stdout(),
        FileDurationStore::new(&config.state.path),
    )
    .with_default_duration(config.default_duration()?))
}

fn load_snapshot(config: &Config, args: &SnapshotArgs) -> anyhow::Result<AutomationSnapshot> {
    let path: &Path = args.snapshot.as_deref().unwrap_or(&config.snapshot.path);
    Ok(snapshot::load(path)?)
}

fn parse(text: &str) -> anyhow::Result<()> {
    let duration = duration::parse(text).with_context(|| format!("invalid duration {text:?}"))?;
    println!("short: {duration}");
    println!("long: {}", duration.format_long());
    println!("minutes: {}", duration.to_minutes());
    Ok(())
}

async fn presets(config: &Config) -> anyhow::Result<()> {
    for preset in config.presets()? {
        println!("{preset}\t{}", preset.format_long());
    }
    let last = snooze_service(config)?
        .last_duration()
        .await
        .context("failed to read last used duration")?;
    println!("last used: {last}");
    Ok(())
}

fn list(config: &Config, args: &ListArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config, &args.source)?;
    let service = EligibilityService::new(config.policy());

    let eligible = service.eligible(&snapshot, &args.search);

    match args.group_by {
        Some(group_by) => {
            for (key, members) in service.group(&snapshot, &eligible, group_by.into()) {
                println!("{key} ({})", members.len());
                for automation in members {
                    println!("  {}\t{}", automation.id, automation.display_name());
                }
            }
        }
        None => {
            for automation in &eligible {
                println!("{}\t{}", automation.id, automation.display_name());
            }
        }
    }

    let counts = service.count_facets(&snapshot, &eligible);
    println!(
        "{} eligible, areas: {}, categories: {}, labels: {}",
        eligible.len(),
        counts.areas,
        counts.categories,
        counts.labels
    );
    Ok(())
}

async fn pause(config: &Config, args: &PauseArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config, &args.source)?;
    let targets = EligibilityService::new(config.policy())
        .resolve_targets(&snapshot, &args.ids)
        .context("cannot pause the requested automations")?;
    let service = snooze_service(config)?;

    let command = if let Some(resume_at) = args.until {
        service.pause_scheduled(targets, args.from, resume_at).await
    } else if let Some(text) = args.duration.as_deref() {
        service.pause(targets, text).await
    } else {
        let duration = service
            .last_duration()
            .await
            .context("failed to read last used duration")?;
        service.pause_for(targets, duration).await
    }
    .context("failed to pause automations")?;

    if let Some(resume_at) = command.resume_at(SystemClock.now()) {
        tracing::info!(%resume_at, "automations will resume");
    }
    Ok(())
}

async fn wake(config: &Config, args: WakeArgs) -> anyhow::Result<()> {
    let service = snooze_service(config)?;
    let result = if args.all {
        service.wake_all().await
    } else {
        service.wake(args.ids).await
    };
    result.context("failed to wake automations")?;
    Ok(())
}

async fn run_countdown(args: &CountdownArgs) -> anyhow::Result<()> {
    let target = DateTime::parse_from_rfc3339(&args.target)
        .with_context(|| format!("invalid countdown target {:?}", args.target))?
        .to_utc();
    let clock = SystemClock;

    println!("{}", format_countdown(target, &clock, &args.expired_label));
    if target <= clock.now() {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handle = countdown::start(move || {
        // The receiver only goes away once we stop listening.
        let _ = tx.send(());
    });

    let mut ticks = 0_u32;
    loop {
        tokio::select! {
            tick = rx.recv() => {
                if tick.is_none() {
                    break;
                }
                ticks += 1;
                println!("{}", format_countdown(target, &clock, &args.expired_label));
                if target <= clock.now() || args.ticks.is_some_and(|max| ticks >= max) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop();
    Ok(())
}
