//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::config_sentiment_adapter::ConfigSentimentAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stdout_notifier::StdoutNotifier;
use crate::adapters::text_report::format_message;
use crate::domain::config::SignalConfig;
use crate::domain::cycle::{run_cycle, SignalReport};
use crate::domain::error::SignalError;
use crate::domain::scoring::{total_score, SentimentZone};
use crate::domain::verdict::classify_day;
use crate::ports::market_port::MarketDataPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::sentiment_port::SentimentPort;

#[derive(Parser, Debug)]
#[command(name = "daysignal", about = "Daily crypto market signal and trade plans")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one evaluation cycle and deliver the message
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
        /// Read prices from <DIR>/<SYMBOL>.csv instead of the configured source
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Score four observations and print the day verdict
    Score {
        /// 7d ETF net flow, US$ millions
        #[arg(long, allow_negative_numbers = true)]
        etf: f64,
        /// 7d stablecoin market cap change, US$
        #[arg(long, allow_negative_numbers = true)]
        stable_change: f64,
        /// VC funding rounds in the last 7 days
        #[arg(long)]
        vc: u32,
        /// Treasury conviction points (0, 10, 20)
        #[arg(long, allow_negative_numbers = true)]
        treasury: i64,
        /// Config providing the day thresholds; defaults apply otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the chat id of the last message sent to the bot
    ChatId {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            dry_run,
            csv_dir,
        } => run_signal(&config, dry_run, csv_dir.as_deref()),
        Command::Score {
            etf,
            stable_change,
            vc,
            treasury,
            config,
        } => run_score(etf, stable_change, vc, treasury, config.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ChatId { config } => run_chat_id(&config),
    }
}

fn fail(err: SignalError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SignalError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn run_signal(config_path: &Path, dry_run: bool, csv_dir: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let config = match SignalConfig::from_port(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let market = match build_market(&adapter, csv_dir) {
        Ok(m) => m,
        Err(e) => return fail(e),
    };
    let sentiment = match build_sentiment(&adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let notifier: Box<dyn NotifyPort> = if dry_run {
        Box::new(StdoutNotifier::stdout())
    } else {
        match build_notifier(&adapter) {
            Ok(n) => n,
            Err(e) => return fail(e),
        }
    };

    match run_pipeline(
        &config,
        market.as_ref(),
        sentiment.as_ref(),
        notifier.as_ref(),
    ) {
        Ok(report) => {
            let failed = report.failed_coins().count();
            if failed > 0 {
                warn!(failed, "some coins could not be evaluated");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Evaluate, format and deliver. Returns the report that was sent.
pub fn run_pipeline(
    config: &SignalConfig,
    market: &dyn MarketDataPort,
    sentiment: &dyn SentimentPort,
    notifier: &dyn NotifyPort,
) -> Result<SignalReport, SignalError> {
    info!(coins = config.coins.len(), "starting evaluation cycle");
    let report = run_cycle(config, market, sentiment);
    let text = format_message(&report, config);
    notifier.deliver(&text)?;
    Ok(report)
}

pub fn build_market(
    adapter: &FileConfigAdapter,
    csv_override: Option<&Path>,
) -> Result<Box<dyn MarketDataPort>, SignalError> {
    if let Some(dir) = csv_override {
        return Ok(Box::new(CsvAdapter::new(dir.to_path_buf())));
    }

    let source = adapter
        .get_non_empty("data", "source")
        .unwrap_or_else(|| default_source("binance", "csv").to_string());

    match source.to_lowercase().as_str() {
        "csv" => {
            let dir = required(adapter, "data", "csv_dir")?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "http")]
        "binance" => {
            use crate::adapters::binance_adapter::{BinanceAdapter, DEFAULT_BASE_URL};
            let base_url = adapter
                .get_non_empty("data", "binance_base_url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            Ok(Box::new(BinanceAdapter::new(&base_url)?))
        }
        other => Err(SignalError::invalid(
            "data",
            "source",
            format!("unsupported market data source {other}"),
        )),
    }
}

pub fn build_sentiment(adapter: &FileConfigAdapter) -> Result<Box<dyn SentimentPort>, SignalError> {
    let source = adapter
        .get_non_empty("sentiment", "source")
        .unwrap_or_else(|| default_source("http", "config").to_string());

    match source.to_lowercase().as_str() {
        "config" => Ok(Box::new(ConfigSentimentAdapter::from_port(adapter)?)),
        #[cfg(feature = "http")]
        "http" => {
            use crate::adapters::config_sentiment_adapter::treasury_points;
            use crate::adapters::sentiment_http_adapter::HttpSentimentAdapter;
            let treasury = treasury_points(adapter)?;
            Ok(Box::new(HttpSentimentAdapter::new(treasury)?))
        }
        other => Err(SignalError::invalid(
            "sentiment",
            "source",
            format!("unsupported sentiment source {other}"),
        )),
    }
}

#[cfg(feature = "http")]
pub fn build_notifier(adapter: &FileConfigAdapter) -> Result<Box<dyn NotifyPort>, SignalError> {
    use crate::adapters::telegram_adapter::{TelegramAdapter, DEFAULT_API_URL};

    let (bot_token, chat_id) = telegram_credentials(adapter)?;
    let api_url = adapter
        .get_non_empty("telegram", "api_url")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    Ok(Box::new(TelegramAdapter::new(&api_url, &bot_token, &chat_id)?))
}

#[cfg(not(feature = "http"))]
pub fn build_notifier(_adapter: &FileConfigAdapter) -> Result<Box<dyn NotifyPort>, SignalError> {
    Err(SignalError::Delivery {
        reason: "http feature is required for telegram delivery; use --dry-run".into(),
    })
}

fn telegram_credentials(adapter: &FileConfigAdapter) -> Result<(String, String), SignalError> {
    let bot_token = require_bot_token(adapter)?;
    let chat_id = required(adapter, "telegram", "chat_id")?;
    Ok((bot_token, chat_id))
}

fn require_bot_token(adapter: &FileConfigAdapter) -> Result<String, SignalError> {
    required(adapter, "telegram", "bot_token")
}

fn required(adapter: &FileConfigAdapter, section: &str, key: &str) -> Result<String, SignalError> {
    adapter
        .get_non_empty(section, key)
        .ok_or_else(|| SignalError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}

fn default_source(with_http: &'static str, without_http: &'static str) -> &'static str {
    if cfg!(feature = "http") {
        with_http
    } else {
        without_http
    }
}

fn run_score(
    etf: f64,
    stable_change: f64,
    vc: u32,
    treasury: i64,
    config_path: Option<&Path>,
) -> ExitCode {
    let config = match config_path {
        Some(path) => match load_config(path).and_then(|a| SignalConfig::from_port(&a)) {
            Ok(c) => c,
            Err(e) => return fail(e),
        },
        None => SignalConfig::default(),
    };

    let (total, b) = total_score(etf, stable_change, vc, treasury);
    let verdict = classify_day(total, config.buy_day_score, config.sell_day_score);

    println!("Score: {total}/100");
    println!(
        "Breakdown: ETF {}/35 | Stable {}/30 | VC {}/15 | Treasury {}/20",
        b.etf, b.stable, b.vc, b.treasury
    );
    println!("Zone: {}", SentimentZone::from_score(total));
    println!(
        "Verdict: {verdict} (buy >= {}, sell <= {})",
        config.buy_day_score, config.sell_day_score
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    // builds every adapter without touching the network
    let checks = SignalConfig::from_port(&adapter).and_then(|config| {
        build_market(&adapter, None)?;
        build_sentiment(&adapter)?;
        telegram_credentials(&adapter)?;
        Ok(config)
    });

    match checks {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  Coins: {}", config.coins.join(", "));
            println!(
                "  SMA{} / ATR{} (x{}), reward {}R",
                config.sma_period,
                config.atr_period,
                config.risk.atr_multiplier,
                config.risk.reward_multiplier
            );
            println!(
                "  DCA offsets: {}",
                config
                    .risk
                    .dca_levels_pct
                    .iter()
                    .map(|p| format!("{p}%"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!(
                "  Day thresholds: buy >= {}, sell <= {}",
                config.buy_day_score, config.sell_day_score
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

#[cfg(feature = "http")]
fn run_chat_id(config_path: &Path) -> ExitCode {
    use crate::adapters::telegram_adapter::{TelegramAdapter, DEFAULT_API_URL};

    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let bot_token = match require_bot_token(&adapter) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let api_url = adapter
        .get_non_empty("telegram", "api_url")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let latest = TelegramAdapter::new(&api_url, &bot_token, "")
        .and_then(|telegram| telegram.latest_chat_id());
    match latest {
        Ok(Some(id)) => {
            println!("CHAT_ID = {id}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("No updates found. Send a message to your bot first.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

#[cfg(not(feature = "http"))]
fn run_chat_id(_config_path: &Path) -> ExitCode {
    eprintln!("error: http feature is required for chat-id");
    ExitCode::from(1)
}
