mod logging;
mod play;
mod render;
mod ticker;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueHint};
use contracts::RunConfig;
use dilemma_api::{load_scenarios, serve, DilemmaApi};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Timed ethical dilemmas with an end-of-run tendency report"
)]
struct Cli {
    /// Scenario dataset (JSON); overrides DILEMMA_SCENARIOS_PATH
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    scenarios: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play through every scenario in the terminal
    Play(PlayArgs),

    /// Check a scenario dataset and list what it contains
    Validate,

    /// Serve a single session as a JSON HTTP api
    Serve(ServeArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Timer refresh interval in milliseconds; overrides DILEMMA_TICK_MS
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Hide the live decision timer
    #[arg(long)]
    no_timer: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address; overrides DILEMMA_BIND_ADDR
    #[arg(long)]
    addr: Option<SocketAddr>,
}

fn resolve_config(cli: &Cli) -> RunConfig {
    let mut config = RunConfig::from_env();
    if let Some(path) = &cli.scenarios {
        config.scenarios_path = path.display().to_string();
    }
    config
}

fn run_validate(config: &RunConfig) -> Result<(), String> {
    let scenarios = load_scenarios(&config.scenarios_path).map_err(|err| err.to_string())?;
    println!(
        "valid: {} scenarios in {}",
        scenarios.len(),
        config.scenarios_path
    );
    for scenario in &scenarios {
        println!(
            "  {}: {} ({} / {})",
            scenario.id, scenario.title, scenario.left_choice.title, scenario.right_choice.title
        );
    }
    Ok(())
}

async fn run_play(config: &RunConfig, args: &PlayArgs) -> Result<(), String> {
    let api = DilemmaApi::from_config(config).map_err(|err| err.to_string())?;
    let tick = if args.no_timer {
        None
    } else {
        let millis = args.tick_ms.unwrap_or(config.tick_interval_ms).max(1);
        Some(Duration::from_millis(millis))
    };
    play::play(api, tick).await.map_err(|err| err.to_string())
}

async fn run_serve(config: &RunConfig, args: &ServeArgs) -> Result<(), String> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => config
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| format!("invalid addr: {}", config.bind_addr))?,
    };
    let api = DilemmaApi::from_config(config).map_err(|err| err.to_string())?;
    println!("serving api on http://{addr}");
    serve(addr, api)
        .await
        .map_err(|err| format!("server error: {err}"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init_tracing("info") {
        eprintln!("error: {err}");
    }
    let config = resolve_config(&cli);

    let result = match &cli.command {
        Command::Play(args) => run_play(&config, args).await,
        Command::Validate => run_validate(&config),
        Command::Serve(args) => run_serve(&config, args).await,
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
