//! Web 服务器主程序入口

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caching_translate::env::{core::LogLevel, EnvVar};
use caching_translate::translation::{self, ConfigManager, StoreKind, TranslationConfig};
use caching_translate::web::{WebConfig, WebServer};

/// Caching translation web server
#[derive(Parser, Debug)]
#[command(name = "caching-translate-web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address [default: 127.0.0.1]
    #[arg(short, long)]
    bind: Option<String>,

    /// Port number [default: 7080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML or JSON config file
    #[arg(short, long)]
    config: Option<String>,

    /// Cache store: mongodb, memory
    #[arg(short, long)]
    store: Option<StoreKind>,

    /// Print environment variable documentation and exit
    #[arg(long)]
    env_docs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.env_docs {
        println!("{}", caching_translate::env::generate_env_docs());
        return Ok(());
    }

    // Initialize logging
    let log_level = LogLevel::get_or_default("info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    translation::init();

    let mut config: TranslationConfig = match &args.config {
        Some(path) => ConfigManager::from_file(path)?.into_config(),
        None => ConfigManager::new()?.into_config(),
    };
    if let Some(store) = args.store {
        config.store = store;
    }
    translation::self_check(&config).await?;

    let service = Arc::new(translation::create_service(config).await?);

    let mut web_config = WebConfig::default();
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }

    // 启动 Web 服务器
    WebServer::new(web_config, service).start().await?;

    Ok(())
}
