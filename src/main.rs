use clap::Parser;
use csv_normalizer::utils::{logger, validation::Validate};
use csv_normalizer::{CliConfig, EtlEngine, LocalStorage, NormalizePipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(&config.log_level, config.json_logs);
    tracing::debug!("Run config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new(config.input.clone(), config.output.clone());
    let pipeline = NormalizePipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Wrote {} rows, dropped {}",
                summary.rows_written,
                summary.rows_dropped
            );
        }
        Err(e) => {
            tracing::error!("❌ Normalization failed: {} (kind: {:?})", e, e.kind());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
