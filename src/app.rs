use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::core::{
    alerts::model::AlertId,
    catalog::LocationCatalog,
    classifier::occupancy_ratio,
    clock::{Clock, SystemClock},
    config::ConfigManager,
    coordinator::Coordinator,
    error::ConfigurationError,
    history::{self, HourlyPoint},
    model::{CrowdReading, LocationId, RiskLevel},
    predictor::PredictionModel,
    simulator::CrowdSimulator,
};

/// Directory holding settings.json; defaults to the working directory
const CONFIG_DIR_ENV: &str = "CROWD_WATCH_CONFIG_DIR";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Operator commands read from stdin, one per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopCommand {
    Pause,
    Resume,
    Resolve(AlertId),
    Status,
    Alerts,
    /// Hour-of-day averages from the backfill, for one location or all
    History(Option<LocationId>),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error(
    "Unknown command '{0}' (try pause, resume, resolve <id>, status, alerts, history [<location>], quit)"
)]
pub struct UnknownCommand(String);

impl FromStr for LoopCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownCommand(s.trim().to_string());
        let mut parts = s.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(unknown());
        }

        match (verb.as_str(), argument) {
            ("pause", None) => Ok(Self::Pause),
            ("resume", None) => Ok(Self::Resume),
            ("resolve", Some(id)) => id.parse().map(Self::Resolve).map_err(|_| unknown()),
            ("status", None) => Ok(Self::Status),
            ("alerts", None) => Ok(Self::Alerts),
            ("history", location) => Ok(Self::History(location.map(str::to_string))),
            ("quit" | "exit", None) => Ok(Self::Quit),
            _ => Err(unknown()),
        }
    }
}

pub fn run() -> Result<(), AppError> {
    init_logger();

    let config_dir = std::env::var_os(CONFIG_DIR_ENV).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let settings = ConfigManager::new(config_dir).load();

    let catalog = match &settings.catalog_path {
        Some(path) => LocationCatalog::from_json_file(path)?,
        None => LocationCatalog::builtin(),
    };

    let (mut simulator, mut history_rng) = match settings.seed {
        Some(seed) => {
            log::info!("Using fixed seed {}", seed);
            (
                CrowdSimulator::seeded(seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            )
        }
        None => (CrowdSimulator::from_entropy(), ChaCha8Rng::from_entropy()),
    };
    simulator.initialize(&catalog);
    log::info!(
        "Monitoring {} locations with total capacity {}",
        catalog.len(),
        catalog.total_capacity()
    );

    let backfill = history::generate_history(
        &catalog,
        settings.history_days,
        SystemClock.now(),
        &mut history_rng,
    );
    log::info!(
        "Backfilled {} readings over {} days",
        backfill.len(),
        settings.history_days
    );

    let console = Console { catalog, backfill };
    let coordinator = Coordinator::new(simulator, settings.live_updates);
    let period = Duration::from_secs(settings.tick_interval_secs.max(1));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(coordinator, console, period));
    // the stdin reader may still be parked on a blocking read
    runtime.shutdown_background();
    Ok(())
}

fn init_logger() {
    // Ignore error if logger was already set
    let _ = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .try_init();
}

/// Read-only data the operator commands consult
struct Console {
    catalog: LocationCatalog,
    backfill: Vec<CrowdReading>,
}

impl Console {
    /// Display label and hourly profile, or None for a location not in the catalog.
    fn profile(&self, location_id: Option<&str>) -> Option<(String, Vec<HourlyPoint>)> {
        let label = match location_id {
            Some(id) => self.catalog.get(id)?.name.clone(),
            None => "all locations".to_string(),
        };
        Some((label, history::hourly_profile(&self.backfill, location_id)))
    }
}

async fn drive(mut coordinator: Coordinator, console: Console, period: Duration) {
    let (tx, mut rx) = mpsc::channel::<LoopCommand>(16);
    tokio::spawn(read_commands(tx));

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; initialize already produced the opening snapshot
    ticker.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut commands_open = true;

    log::info!(
        "Live loop started, ticking every {}s (live updates {})",
        period.as_secs(),
        if coordinator.live_updates() { "on" } else { "off" }
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let output = coordinator.tick();
                for msg in output.logs {
                    log::warn!("{}", msg);
                }
            }
            command = rx.recv(), if commands_open => match command {
                Some(LoopCommand::Quit) => break,
                Some(command) => handle_command(&mut coordinator, &console, command),
                None => commands_open = false,
            },
            _ = &mut shutdown => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    log::info!(
        "Stopped after {} ticks, {} alerts raised",
        coordinator.ticks(),
        coordinator.simulator().alert_history().len()
    );
}

async fn read_commands(tx: mpsc::Sender<LoopCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<LoopCommand>() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }
}

fn handle_command<R: Rng, C: Clock, M: PredictionModel>(
    coordinator: &mut Coordinator<R, C, M>,
    console: &Console,
    command: LoopCommand,
) {
    match command {
        LoopCommand::Pause => coordinator.set_live_updates(false),
        LoopCommand::Resume => coordinator.set_live_updates(true),
        LoopCommand::Resolve(id) => {
            if !coordinator.resolve_alert(id) {
                match coordinator.simulator().alert(id) {
                    Some(_) => log::info!("{} is already resolved", id),
                    None => log::info!("No alert {}", id),
                }
            }
        }
        LoopCommand::Status => log_status(coordinator),
        LoopCommand::Alerts => {
            let active = coordinator.active_alerts();
            if active.is_empty() {
                log::info!("No active alerts");
            }
            for alert in active {
                log::info!(
                    "{} {} {} [{:?}] {}",
                    alert.id,
                    alert.timestamp.format("%H:%M:%S"),
                    alert.alert_type.display_name(),
                    alert.severity,
                    alert.message
                );
            }
        }
        LoopCommand::History(location_id) => log_history(console, location_id.as_deref()),
        LoopCommand::Quit => {}
    }
}

fn log_history(console: &Console, location_id: Option<&str>) {
    let Some((label, profile)) = console.profile(location_id) else {
        log::info!("Unknown location {}", location_id.unwrap_or_default());
        return;
    };
    if profile.is_empty() {
        log::info!("No backfilled readings for {}", label);
        return;
    }
    log::info!("Hourly averages for {}", label);
    for point in profile {
        log::info!(
            "  {:02}:00 actual {:>6} predicted {:>6} [{:?}]",
            point.hour,
            point.actual,
            point.predicted,
            point.risk
        );
    }
}

fn log_status<R: Rng, C: Clock, M: PredictionModel>(coordinator: &Coordinator<R, C, M>) {
    let insights = coordinator.insights();
    log::info!(
        "{} people across {} capacity ({}%), trend {:?}",
        insights.total_people,
        insights.total_capacity,
        insights.utilization_percent,
        insights.trend
    );
    log::info!(
        "Risk: {} safe, {} warning, {} critical; {} critical alerts open",
        insights.safe_locations,
        insights.warning_locations,
        insights.critical_locations,
        insights.critical_alerts
    );
    for (category, stats) in &insights.by_category {
        log::info!(
            "  {}: {} people in {} locations ({}%)",
            category.display_name(),
            stats.people,
            stats.locations,
            stats.utilization_percent()
        );
    }
    let snapshot = coordinator.snapshot();
    for location in coordinator.simulator().locations() {
        let Some(reading) = snapshot.get(&location.id) else {
            continue;
        };
        if reading.risk_level == RiskLevel::Safe {
            continue;
        }
        log::info!(
            "  {} {:?}: {} of {} ({:.0}%)",
            location.name,
            reading.risk_level,
            reading.current_count,
            location.capacity,
            occupancy_ratio(reading.current_count, location.capacity) * 100.0
        );
    }
    for recommendation in &insights.recommendations {
        log::info!("  {} -> {}", recommendation.message(), recommendation.action());
    }
}
