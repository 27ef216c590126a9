//! buff_sim - Drives buff_core the way a host game would and exports the registry

mod host;
mod simulation;

use buff_core::config::ConfigError;
use buff_core::export::{export_csv, export_json};
use buff_core::{BuffConfig, BuffList, BuffRegistry, CatalogError, DurationHook, SyncOutcome, TomlSettingsStore};
use clap::{Parser, Subcommand, ValueEnum};
use host::SimCatalog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simulation::BuffSimulation;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(version, about = "Buff duration extension simulator")]
struct Cli {
    /// Settings file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// RNG seed for the generated host catalog and events
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply random buffs to a character and report what was rewritten
    Simulate {
        #[arg(short, long, default_value_t = 200)]
        events: u32,
        /// Largest pause between two applications, in seconds
        #[arg(long, default_value_t = 10.0, value_parser = parse_max_gap)]
        max_gap: f64,
    },
    /// Write the synced registry as CSV or JSON
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the ids currently allowed to extend
    Allowed,
    /// Write the effective settings as TOML
    Settings,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

/// Accept only positive, finite pauses
fn parse_max_gap(value: &str) -> Result<f64, String> {
    let gap: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if gap.is_finite() && gap > 0.0 {
        Ok(gap)
    } else {
        Err(format!("max gap must be a positive number of seconds, got {value}"))
    }
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<BuffConfig, SimError> {
    let Some(path) = path else {
        return Ok(BuffConfig::default());
    };
    let store = TomlSettingsStore::from_path(path)?;
    let config = BuffConfig::from_store(&store);
    tracing::info!(path = %path.display(), revision = config.revision(), "Settings loaded");
    Ok(config)
}

/// Build a hook and run the one-time catalog sync
fn setup(cli: &Cli, rng: &mut ChaCha8Rng) -> Result<(DurationHook, SimCatalog), SimError> {
    let config = match load_config(cli.settings.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            // Settings are optional: fall back to defaults
            tracing::error!(error = %e, "Settings unavailable, using defaults");
            BuffConfig::default()
        }
    };

    let mut hook = DurationHook::new(BuffRegistry::with_seed_data(), config);
    let catalog = SimCatalog::generate(rng, 0.1);
    if let SyncOutcome::Applied(report) = hook.sync_catalog(&catalog)? {
        tracing::debug!(known = report.known(), "Catalog entries matched seed data");
    }
    Ok((hook, catalog))
}

fn run(cli: Cli) -> Result<(), SimError> {
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let (mut hook, catalog) = setup(&cli, &mut rng)?;

    match cli.command {
        Commands::Simulate { events, max_gap } => {
            let mut character = BuffList::new();
            let prefabs = catalog.applicable();
            let result = BuffSimulation::run(&mut hook, &mut character, &prefabs, events, max_gap, &mut rng);

            println!("Applications:     {}", result.applications);
            println!("Extended:         {}", result.extended);
            println!("Denied:           {}", result.denied);
            println!("Unlimited:        {}", result.unlimited);
            println!("Expired:          {}", result.expired);
            println!("Bonus seconds:    {:.1}", result.bonus_seconds);
            println!("Longest duration: {:.1}", result.longest_duration);
            println!("Registry size:    {}", hook.registry().len());
            println!("Still active:     {}", character.len());
        }
        Commands::Export { format, out } => {
            let content = match format {
                ExportFormat::Csv => export_csv(hook.registry()),
                ExportFormat::Json => export_json(hook.registry())?,
            };
            match out {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    tracing::info!(path = %path.display(), rows = hook.registry().len(), "Registry exported");
                }
                None => print!("{}", content),
            }
        }
        Commands::Allowed => {
            for id in hook.registry().log_allowed_extensions() {
                println!("{}", id);
            }
        }
        Commands::Settings => {
            let mut store = TomlSettingsStore::new();
            hook.config().save(&mut store);
            print!("{}", store.to_toml_string()?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "buff_sim failed");
            ExitCode::FAILURE
        }
    }
}
