use anyhow::Context;
use calendar_relay::utils::logger;
use calendar_relay::{api, CliConfig, FileLogSink, LocalStorage, Relay, RelayConfig, SftpClient};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting calendar-relay");

    let config = match RelayConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Relay config: {:?}", config);
    }

    let addr = config.server.socket_addr()?;
    let storage = LocalStorage::new(config.documents.output_dir.clone());
    let log = FileLogSink::new(config.documents.log_path());
    let transfer = SftpClient::new(config.sftp.clone());

    let relay = Arc::new(Relay::new(
        storage,
        transfer,
        log,
        config.documents,
        config.remote,
    ));

    api::start_server(relay, addr)
        .await
        .with_context(|| format!("HTTP server on {} stopped with an error", addr))?;

    Ok(())
}
