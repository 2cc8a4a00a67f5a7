//! ProTrader CLI: signal analysis over local price files.
//!
//! Commands:
//! - `analyze`: full report (signal, confidence, reasons, levels) for one file
//! - `levels`: support/resistance and risk levels only
//! - `consensus`: majority vote across one file per timeframe
//! - `markets`: market classification and available intervals for symbols
//!
//! Reports go to stdout as JSON; logs go to stderr (`RUST_LOG` filters them).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use protrader_core::engine::DecisionPolicy;
use protrader_core::market::Market;
use protrader_runner::{
    analyze_file, load_input, run_consensus, AppConfig, TimeframeInput,
};

#[derive(Parser)]
#[command(
    name = "protrader",
    version,
    about = "ProTrader CLI: BUY/SELL/HOLD signals with confidence and levels"
)]
struct Cli {
    /// Print single-line JSON instead of pretty-printed.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one price file (.csv or .json).
    Analyze {
        input: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Support/resistance, entry, stop-loss and take-profit for one file.
    Levels {
        input: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Combine one file per timeframe by majority vote.
    Consensus {
        /// Symbol the files belong to; decides the market and its intervals.
        #[arg(long)]
        symbol: String,

        /// Timeframe inputs as TF=PATH (e.g. 5m=data/aapl_5m.csv).
        #[arg(value_parser = parse_timeframe_input)]
        inputs: Vec<TimeframeInput>,

        /// Directory holding <timeframe>.csv / <timeframe>.json files, used
        /// for the configured timeframes when no TF=PATH inputs are given.
        #[arg(long)]
        dir: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Show market classification and supported intervals.
    Markets {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decision policy (overrides the config).
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Level look-back in bars (overrides the config).
    #[arg(long)]
    lookback: Option<usize>,

    /// Analyze only the most recent N bars (overrides the config).
    #[arg(long)]
    max_bars: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Weighted,
    Strict,
}

impl From<PolicyArg> for DecisionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Weighted => DecisionPolicy::WeightedScore,
            PolicyArg::Strict => DecisionPolicy::StrictConsensus,
        }
    }
}

impl EngineArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(policy) = self.policy {
            config.engine.policy = policy.into();
        }
        if let Some(lookback) = self.lookback {
            config.engine.levels.lookback = lookback;
        }
        if let Some(max_bars) = self.max_bars {
            config.data.max_bars = Some(max_bars);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "protrader=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let compact = cli.compact;

    match cli.command {
        Commands::Analyze { input, engine } => run_analyze(&input, &engine, compact),
        Commands::Levels { input, engine } => run_levels(&input, &engine, compact),
        Commands::Consensus {
            symbol,
            inputs,
            dir,
            engine,
        } => run_consensus_cmd(&symbol, inputs, dir.as_deref(), &engine, compact),
        Commands::Markets { symbols } => run_markets(&symbols, compact),
    }
}

fn run_analyze(input: &Path, args: &EngineArgs, compact: bool) -> Result<()> {
    let config = args.resolve()?;
    let engine = config.build_engine();
    let report = analyze_file(&engine, input, config.data.max_bars)?;
    print_json(&report, compact)
}

fn run_levels(input: &Path, args: &EngineArgs, compact: bool) -> Result<()> {
    let config = args.resolve()?;
    let engine = config.build_engine();
    let series = load_input(input)?
        .resolve(config.data.max_bars)
        .with_context(|| format!("resolving prices in {}", input.display()))?;
    print_json(&engine.levels(&series), compact)
}

fn run_consensus_cmd(
    symbol: &str,
    inputs: Vec<TimeframeInput>,
    dir: Option<&Path>,
    args: &EngineArgs,
    compact: bool,
) -> Result<()> {
    let config = args.resolve()?;
    let inputs = match (inputs.is_empty(), dir) {
        (false, _) => inputs,
        (true, Some(dir)) => inputs_from_dir(symbol, dir, &config.data.timeframes),
        (true, None) => bail!("give TF=PATH inputs or --dir"),
    };
    if inputs.is_empty() {
        bail!("no timeframe inputs found for {symbol}");
    }

    let engine = config.build_engine();
    let result = run_consensus(&engine, symbol, &inputs, config.data.max_bars)?;
    print_json(&result, compact)
}

/// `<dir>/<tf>.csv` or `<dir>/<tf>.json` for each configured timeframe the
/// symbol's market offers.
fn inputs_from_dir(symbol: &str, dir: &Path, timeframes: &[String]) -> Vec<TimeframeInput> {
    let market = Market::infer(symbol);
    let mut inputs = Vec::new();
    for tf in timeframes {
        if !market.supports(tf) {
            warn!(timeframe = %tf, market = %market, "timeframe not offered, skipping");
            continue;
        }
        let found = ["csv", "json"]
            .iter()
            .map(|ext| dir.join(format!("{tf}.{ext}")))
            .find(|p| p.is_file());
        match found {
            Some(path) => inputs.push(TimeframeInput::new(tf.as_str(), path)),
            None => info!(timeframe = %tf, dir = %dir.display(), "no file for timeframe"),
        }
    }
    inputs
}

#[derive(Serialize)]
struct MarketInfo<'a> {
    symbol: &'a str,
    market: Market,
    provider_symbol: String,
    intervals: &'static [&'static str],
}

fn run_markets(symbols: &[String], compact: bool) -> Result<()> {
    let infos: Vec<MarketInfo<'_>> = symbols
        .iter()
        .map(|s| {
            let market = Market::infer(s);
            MarketInfo {
                symbol: s.as_str(),
                market,
                provider_symbol: market.provider_symbol(s),
                intervals: market.supported_intervals(),
            }
        })
        .collect();
    print_json(&infos, compact)
}

fn parse_timeframe_input(s: &str) -> std::result::Result<TimeframeInput, String> {
    match s.split_once('=') {
        Some((tf, path)) if !tf.trim().is_empty() && !path.trim().is_empty() => {
            Ok(TimeframeInput::new(tf.trim(), path.trim()))
        }
        _ => Err(format!("expected TF=PATH, got '{s}'")),
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
