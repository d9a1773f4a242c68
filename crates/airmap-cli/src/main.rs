use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use airmap_cli::commands::{execute, CommandContext, MapCommand};
use airmap_cli::output::{describe_failure, OutputFormat};
use airmap_cli::shell::run_shell;
use airmap_lib::{
    resolve_map_source, resolve_state_path, AirMap, Error as LibError, FareConfig, FlightConfig,
    RouteMode,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query and edit an airline flight map")]
struct Cli {
    /// Map file to load instead of the saved state.
    #[arg(long, global = true)]
    map: Option<PathBuf>,

    /// Treat routes in --map and in `load` files as one-way flights.
    #[arg(long, global = true)]
    directed: bool,

    /// Override where the map state is saved (defaults to AIRMAP_STATE_FILE
    /// or the platform data directory).
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Fare per kilometre on the first leg of a route.
    #[arg(long, global = true)]
    price_per_km: Option<f64>,

    /// Reduction of the per-kilometre fare for each connecting leg.
    #[arg(long, global = true)]
    discount: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Map(MapCommand),
    /// Start an interactive shell; edits are kept until `save`.
    Shell,
}

impl Cli {
    fn load_mode(&self) -> RouteMode {
        if self.directed {
            RouteMode::Directed
        } else {
            RouteMode::Symmetric
        }
    }

    fn flight_config(&self) -> FlightConfig {
        let defaults = FlightConfig::default();
        FlightConfig {
            fare: FareConfig {
                price_per_km: self.price_per_km.unwrap_or(defaults.fare.price_per_km),
                connecting_discount: self
                    .discount
                    .unwrap_or(defaults.fare.connecting_discount),
            },
            ..defaults
        }
    }

    /// `load` and `shell` may start from an empty map.
    fn allows_empty_map(&self) -> bool {
        matches!(
            self.command,
            Command::Shell | Command::Map(MapCommand::Load { .. })
        )
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe_failure(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let state_path = resolve_state_path(cli.state_file.as_deref())
        .context("failed to resolve the saved-state location")?;
    let mut map = open_map(cli, &state_path)?
        .with_config(cli.flight_config())
        .context("invalid fare settings")?;

    let ctx = CommandContext {
        format: cli.format,
        state_path: state_path.clone(),
        load_mode: cli.load_mode(),
    };

    match &cli.command {
        Command::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_shell(&mut map, &ctx, stdin.lock(), &mut stdout)
        }
        Command::Map(command) => {
            let text = execute(&mut map, command, &ctx)?;
            print!("{text}");
            if command.is_mutating() {
                map.save(&state_path).with_context(|| {
                    format!("failed to save map state to {}", state_path.display())
                })?;
            }
            Ok(())
        }
    }
}

fn open_map(cli: &Cli, state_path: &Path) -> Result<AirMap> {
    let source = match resolve_map_source(cli.map.as_deref(), cli.directed, state_path) {
        Ok(source) => source,
        Err(LibError::MapNotFound) if cli.allows_empty_map() => {
            debug!("no map data found; starting with an empty map");
            return Ok(AirMap::default());
        }
        Err(err) => return Err(err.into()),
    };
    debug!(path = %source.path.display(), mode = ?source.mode, "loading map");
    AirMap::load(&source.path, source.mode)
        .with_context(|| format!("failed to load map from {}", source.path.display()))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
