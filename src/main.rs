//! courtside - local basketball games in your terminal
//!
//! A login gate in front of a searchable list of nearby games and
//! tournaments, with a detail view per game.

mod auth;
mod catalog;
mod config;
mod core;
mod data;
mod frontend;
mod location;

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(ClapParser)]
#[command(name = "courtside")]
#[command(about = "Browse local basketball games and tournaments", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.courtside)
    /// Can also be set via COURTSIDE_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print games (or tournaments) matching a search
    List {
        /// Query the tournaments list instead of games
        #[arg(long)]
        tournaments: bool,

        /// Case-insensitive search over teams, venue and league
        #[arg(short, long, default_value = "")]
        search: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Try a simulated login against the demo account store
    Login {
        #[arg(long)]
        email: String,

        /// Password (omit to be prompted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Validate a catalog file
    ValidateCatalog {
        /// Catalog file to validate (defaults to the built-in catalog)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Apply data directory override before anything resolves paths
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    let config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };

    init_logging(&config)?;
    if let Some(data_dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", data_dir);
    }

    match cli.command {
        Some(Commands::List {
            tournaments,
            search,
            json,
        }) => {
            let kind = if tournaments {
                catalog::ListKind::Tournaments
            } else {
                catalog::ListKind::Games
            };
            print_list(&config, kind, &search, json)
        }
        Some(Commands::Login { email, password }) => run_login(&email, password),
        Some(Commands::ValidateCatalog { file }) => validate_catalog(file),
        // Only persist into the data directory, never over a --config file
        None => {
            let save_dir = match &cli.config {
                Some(_) => None,
                None => Some(config::Config::base_dir()?),
            };
            run_tui(config, save_dir)
        }
    }
}

/// Initialize logging to file (RUST_LOG overrides the configured level).
/// The TUI owns stdout, so we write to a file.
fn init_logging(config: &config::Config) -> Result<()> {
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let level = config.logging.level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    Ok(())
}

fn print_list(
    config: &config::Config,
    kind: catalog::ListKind,
    search: &str,
    json: bool,
) -> Result<()> {
    let catalog = config.load_catalog()?;
    println!("{}", list_output(&catalog, kind, search, json)?);
    Ok(())
}

/// Render the `list` command's output as a table or JSON
fn list_output(
    catalog: &catalog::GameCatalog,
    kind: catalog::ListKind,
    search: &str,
    json: bool,
) -> Result<String> {
    let games = catalog.query(kind, search);
    tracing::info!(
        "CLI query on {} for {:?} returned {} records",
        kind.label(),
        search,
        games.len()
    );

    if json {
        return serde_json::to_string_pretty(&games).context("Failed to serialize results");
    }

    if games.is_empty() {
        return Ok(format!(
            "No {} match {:?}",
            kind.label().to_lowercase(),
            search
        ));
    }

    let rows: Vec<String> = games
        .iter()
        .map(|game| {
            format!(
                "{}  {:<10} {:<45} {} ({})",
                game.date.format("%Y-%m-%d"),
                game.time,
                game.matchup(),
                game.venue,
                game.league
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

fn run_login(email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(pwd) => pwd,
        None => {
            let prompt = format!("Password for {}: ", email);
            rpassword::prompt_password(prompt).context("Failed to read password")?
        }
    };

    let mut session = auth::AuthSession::with_demo_store();
    println!("{}", login_output(&mut session, email, &password)?);
    Ok(())
}

fn login_output(session: &mut auth::AuthSession, email: &str, password: &str) -> Result<String> {
    match session.login(email, password) {
        Ok(profile) => Ok(format!(
            "✓ Signed in as {} ({})",
            profile.username, profile.id
        )),
        Err(e) => bail!("Login failed: {}", e),
    }
}

fn validate_catalog(file: Option<PathBuf>) -> Result<()> {
    let catalog = match &file {
        Some(path) => {
            println!("Validating catalog file: {:?}", path);
            catalog::GameCatalog::load_from_file(path)?
        }
        None => {
            println!("Validating built-in catalog");
            catalog::GameCatalog::builtin()?
        }
    };

    println!("✓ Catalog loaded successfully");
    println!(
        "  {} games, {} tournaments",
        catalog.records(catalog::ListKind::Games).len(),
        catalog.records(catalog::ListKind::Tournaments).len()
    );

    let warnings = catalog_warnings(&catalog);
    for warning in &warnings {
        eprintln!("⚠ Warning: {}", warning);
    }

    if warnings.is_empty() {
        println!("✓ Catalog is valid with no issues");
    } else {
        println!("{} warning(s)", warnings.len());
    }
    Ok(())
}

/// Problems that don't stop a catalog from loading but are worth reporting
fn catalog_warnings(catalog: &catalog::GameCatalog) -> Vec<String> {
    let mut warnings = Vec::new();
    if catalog.is_empty() {
        warnings.push("catalog has no games or tournaments".to_string());
    }

    let games = catalog.records(catalog::ListKind::Games);
    let tournaments = catalog.records(catalog::ListKind::Tournaments);
    for game in games.iter().chain(tournaments.iter()) {
        if !game.coordinate.is_valid() {
            warnings.push(format!(
                "'{}' has an out-of-range coordinate ({}, {})",
                game.matchup(),
                game.coordinate.latitude,
                game.coordinate.longitude
            ));
        }
        if game.venue.trim().is_empty() {
            warnings.push(format!("'{}' has no venue", game.matchup()));
        }
    }
    warnings
}

/// Run TUI frontend
fn run_tui(config: config::Config, save_dir: Option<PathBuf>) -> Result<()> {
    // Tokio runtime drives the location provider task
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_tui(config, save_dir))
}

/// Async TUI main loop
async fn async_run_tui(config: config::Config, save_dir: Option<PathBuf>) -> Result<()> {
    use crate::core::AppCore;
    use frontend::{Frontend, TuiFrontend};
    use location::{LocationProvider, LocationUpdate};
    use tokio::sync::mpsc;

    let catalog = config.load_catalog()?;
    tracing::info!("Catalog ready with {} records", catalog.len());

    let (location_tx, mut location_rx) = mpsc::unbounded_channel::<LocationUpdate>();
    let location_handle = LocationProvider::spawn(config.location.clone(), location_tx);

    let poll_timeout = Duration::from_millis(config.ui.poll_interval_ms);
    let mut app_core = AppCore::new(config, catalog);
    let mut frontend = TuiFrontend::new(poll_timeout)?;

    // Main event loop
    while app_core.running {
        for event in frontend.poll_events()? {
            app_core.handle_event(event);
        }

        while let Ok(update) = location_rx.try_recv() {
            app_core.apply_location(update);
        }

        if app_core.needs_render {
            frontend.render(&app_core)?;
            app_core.needs_render = false;
        }

        // Let the location task make progress between frames
        tokio::task::yield_now().await;
    }

    location_handle.abort();
    frontend.cleanup()?;

    // Reopen on whichever list the user was browsing
    if let Some(dir) = save_dir {
        if app_core.remember_start_list() {
            if let Err(e) = app_core.config.save_to_dir(&dir) {
                tracing::warn!("Failed to save start list: {:#}", e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSession, DEMO_EMAIL, DEMO_USERNAME};
    use crate::catalog::{GameCatalog, ListKind};

    const BROKEN_CATALOG: &str = r#"
        [[games]]
        home_team = "Nowhere"
        away_team = "Lost"
        date = "2025-11-01T19:00:00"
        time = "7 PM"
        venue = "  "
        address = "Unknown"
        latitude = 123.0
        longitude = 0.0
        league = "Rec"
    "#;

    #[test]
    fn test_list_output_table() {
        let catalog = GameCatalog::builtin().unwrap();
        let out = list_output(&catalog, ListKind::Games, "welsh", false).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("2025-11-08"));
        assert!(out.contains("Welsh-Ryan"));

        let none = list_output(&catalog, ListKind::Tournaments, "zzz", false).unwrap();
        assert_eq!(none, "No tournaments match \"zzz\"");
    }

    #[test]
    fn test_list_output_json() {
        let catalog = GameCatalog::builtin().unwrap();
        let out = list_output(&catalog, ListKind::Games, "", true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed.as_array().map(|games| games.len()),
            Some(catalog.records(ListKind::Games).len())
        );
    }

    #[test]
    fn test_login_output() {
        let mut session = AuthSession::with_demo_store();
        let ok = login_output(&mut session, DEMO_EMAIL, "password").unwrap();
        assert!(ok.contains(DEMO_USERNAME));

        let err = login_output(&mut session, "nobody@x.com", "password").unwrap_err();
        assert_eq!(err.to_string(), "Login failed: invalid email or password");
    }

    #[test]
    fn test_catalog_warnings() {
        assert!(catalog_warnings(&GameCatalog::builtin().unwrap()).is_empty());

        let broken = GameCatalog::from_toml_str(BROKEN_CATALOG).unwrap();
        let warnings = catalog_warnings(&broken);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("out-of-range"));
        assert!(warnings[1].contains("no venue"));

        let empty = GameCatalog::from_toml_str("").unwrap();
        assert_eq!(catalog_warnings(&empty).len(), 1);
    }
}
