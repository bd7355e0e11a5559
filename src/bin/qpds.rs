//! Command line front end for the decision engine.
//!
//! Reads JSON requests (from a file, or stdin with `-`) or builds them from
//! flags, and prints pretty JSON responses.
//!
//! ```text
//! qpds evaluate Ah Kh Qh Jh Th
//! qpds equity --hero AsAh --vs KK --vs "QQ+, AKs"
//! qpds decide --input spot.json --config engine.json
//! ```

use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;

use qpds_engine::api::{Advisor, DecisionRequest, EquityRequest, EvaluateRequest, RangeSpec};
use qpds_engine::cards::parse_cards;
use qpds_engine::config::EngineConfig;
use qpds_engine::equity::MethodPreference;

#[derive(Parser)]
#[command(name = "qpds")]
#[command(about = "Poker hand evaluation, equity and action recommendation")]
struct Cli {
    /// JSON engine configuration (defaults apply to missing fields)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Hide the progress spinner
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a made hand of 5 to 7 cards
    Evaluate {
        /// Cards such as `Ah Kh Qh Jh Th` or `AhKhQhJhTh`
        #[arg(required_unless_present = "input")]
        cards: Vec<String>,
        /// JSON evaluate request (`-` for stdin)
        #[arg(short, long, conflicts_with = "cards")]
        input: Option<PathBuf>,
    },
    /// Equity of a hand against one or more ranges
    Equity {
        /// JSON equity request (`-` for stdin)
        #[arg(short, long, conflicts_with_all = ["hero", "board", "vs"])]
        input: Option<PathBuf>,
        /// Hero's hole cards, e.g. `AsKh`
        #[arg(long, required_unless_present = "input")]
        hero: Option<String>,
        /// Community cards, e.g. `Qd Jc Ts`
        #[arg(short, long)]
        board: Option<String>,
        /// Opponent range in notation; repeat once per opponent
        #[arg(long)]
        vs: Vec<String>,
        /// Monte Carlo trial budget (overrides config)
        #[arg(long)]
        iterations: Option<usize>,
        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Estimation method
        #[arg(long, value_enum, default_value = "auto")]
        method: MethodArg,
    },
    /// Recommend an action for a decision point
    Decide {
        /// JSON decision request (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Auto,
    Exact,
    MonteCarlo,
}

impl From<MethodArg> for MethodPreference {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => MethodPreference::Auto,
            MethodArg::Exact => MethodPreference::Exact,
            MethodArg::MonteCarlo => MethodPreference::MonteCarlo,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let advisor = Advisor::new(config)?;

    match cli.command {
        Commands::Evaluate { cards, input } => {
            let request = match input {
                Some(path) => read_request(&path)?,
                None => EvaluateRequest {
                    cards: split_cards(&cards.join(""))?,
                },
            };
            print_json(&advisor.evaluate(&request)?)?;
        }
        Commands::Equity {
            input,
            hero,
            board,
            vs,
            iterations,
            seed,
            method,
        } => {
            let request = match input {
                Some(path) => read_request(&path)?,
                None => EquityRequest {
                    hero: split_cards(hero.as_deref().unwrap_or_default())?,
                    board: split_cards(board.as_deref().unwrap_or_default())?,
                    opponents: vs.iter().map(|r| RangeSpec::from(r.as_str())).collect(),
                    iterations,
                    seed,
                    method: Some(method.into()),
                },
            };
            let spinner = spinner(cli.quiet, "computing equity...");
            let response = advisor.equity(&request);
            spinner.finish_and_clear();
            print_json(&response?)?;
        }
        Commands::Decide { input } => {
            let request: DecisionRequest = read_request(&input)?;
            let spinner = spinner(cli.quiet, "evaluating decision...");
            let response = advisor.decide(&request);
            spinner.finish_and_clear();
            print_json(&response?)?;
        }
    }

    Ok(())
}

fn read_request<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?
    };
    Ok(serde_json::from_str(&json)?)
}

/// Split `"AsKh"` or `"As Kh"` into card strings for the request contracts.
fn split_cards(s: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let cards = parse_cards(s).ok_or_else(|| format!("invalid cards '{}'", s))?;
    Ok(cards.iter().map(|c| c.to_string()).collect())
}

fn spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let sp = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        sp.set_style(style);
    }
    sp.set_message(message);
    sp.enable_steady_tick(Duration::from_millis(100));
    sp
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
