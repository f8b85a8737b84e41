//! witwhalert - whale transaction alerts for the Witnet blockchain.
//!
//! Follows confirmed blocks on the explorer and posts notable value
//! transfers to Twitter and Telegram.

mod config;

use clap::Parser;
use config::AppConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use witwhalert_alerts::{AlertFormatter, ChannelDispatcher, TelegramChannel, TwitterChannel};
use witwhalert_engine::{Classifier, KnownWalletTable, SyncConfig, SyncLoop};
use witwhalert_explorer::HttpExplorer;

/// witwhalert CLI
#[derive(Parser, Debug)]
#[command(name = "witwhalert")]
#[command(about = "Whale transaction alerts from the Witnet block explorer", long_about = None)]
struct Args {
    /// Env file to load before reading configuration
    #[arg(short, long)]
    env_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run the full pipeline but only log alerts
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build the known-wallet table and read it once, so a missing or broken
/// file is reported at startup. A bad file only disables enrichment.
fn load_known_wallets(path: Option<&Path>) -> KnownWalletTable {
    let Some(path) = path else {
        info!("  Known wallets: none configured");
        return KnownWalletTable::disabled();
    };

    let wallets = KnownWalletTable::from_path(path);
    if wallets.is_empty() {
        warn!(path = %path.display(), "Known wallet table is empty, enrichment disabled");
    } else {
        info!("  Known wallets: {} ({} labels)", path.display(), wallets.len());
    }
    wallets
}

fn build_dispatcher(config: &AppConfig, dry_run: bool) -> Result<ChannelDispatcher, String> {
    let mut dispatcher = ChannelDispatcher::new(AlertFormatter::new(&config.explorer.web_url));

    if dry_run {
        return Ok(dispatcher);
    }

    if config.twitter.enabled {
        if let Some(token) = &config.twitter.access_token {
            let channel = TwitterChannel::new(token.clone()).map_err(|e| e.to_string())?;
            dispatcher = dispatcher.with_channel(Box::new(channel), config.twitter.rate_limit);
        }
    }

    if config.telegram.enabled {
        if let (Some(token), Some(chat_id)) = (&config.telegram.bot_token, config.telegram.chat_id) {
            let channel = TelegramChannel::new(token, chat_id);
            dispatcher = dispatcher.with_channel(Box::new(channel), config.telegram.rate_limit);
        }
    }

    Ok(dispatcher)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load .env file if present
    match &args.env_file {
        Some(path) => {
            if let Err(e) = dotenvy::from_path(path) {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    init_logging(&args.log_level);

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tiers = match config.load_tiers() {
        Ok(tiers) => tiers,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("🐳 witwhalert v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("  Explorer: {}", config.explorer.api_url);
    info!("  Poll interval: {}s", config.sync.poll_secs_interval);
    info!("  Alert floor: {} WITs ({} tiers)", tiers.floor(), tiers.len());
    info!("  Tweets: {}", config.twitter.enabled);
    info!("  Telegram: {}", config.telegram.enabled);
    info!("  Dry run: {}", args.dry_run);

    let wallets = load_known_wallets(config.known_wallets_path.as_deref());

    let explorer = match HttpExplorer::new(&config.explorer.api_url, config.explorer.request_timeout()) {
        Ok(explorer) => explorer,
        Err(e) => {
            error!("Failed to create explorer client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = match build_dispatcher(&config, args.dry_run) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to create notification channels: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if dispatcher.is_empty() {
        warn!("No notification channel enabled, alerts will only be logged");
    } else {
        info!("  Channels: {}", dispatcher.channel_names().join(", "));
    }

    let sync_config = SyncConfig::from(&config.sync);
    let sync = SyncLoop::new(
        explorer,
        Classifier::new(tiers, wallets),
        dispatcher,
        sync_config,
    );

    tokio::select! {
        _ = sync.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping");
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_has_no_channels() {
        let mut config = AppConfig::default();
        config.telegram.enabled = true;
        config.telegram.bot_token = Some("1:a".into());
        config.telegram.chat_id = Some(1);

        assert!(build_dispatcher(&config, true).unwrap().is_empty());
        assert_eq!(
            build_dispatcher(&config, false).unwrap().channel_names(),
            vec!["telegram"]
        );
    }

    #[test]
    fn test_known_wallets_read_at_startup() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"wit1treasury": "Foundation treasury"}}"#).unwrap();
        let wallets = load_known_wallets(Some(file.path()));
        drop(file);

        // Labels were read before the file went away.
        assert_eq!(wallets.len(), 1);
        assert_eq!(
            wallets.label(&witwhalert_core::Address::from("wit1treasury")),
            Some("Foundation treasury")
        );
    }

    #[test]
    fn test_broken_known_wallets_do_not_stop_startup() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let wallets = load_known_wallets(Some(file.path()));
        assert!(wallets.is_configured());
        assert!(wallets.is_empty());

        let missing = load_known_wallets(Some(Path::new("/nonexistent/wallets.json")));
        assert!(missing.is_configured());
        assert!(missing.is_empty());

        assert!(!load_known_wallets(None).is_configured());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["witwhalert", "--dry-run", "-l", "debug"]);
        assert!(args.dry_run);
        assert_eq!(args.log_level, "debug");
        assert!(args.env_file.is_none());
    }
}
