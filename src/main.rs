use clap::Parser;
use passenger_etl::utils::{logger, validation::Validate};
use passenger_etl::{CliConfig, EtlEngine, LocalStorage, PassengerPipeline, RunId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting passenger-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    let storage = LocalStorage::new();
    let pipeline = PassengerPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run(RunId::generate()).await {
        Ok(report) => {
            tracing::info!(
                run_id = %report.run_id,
                records = report.records_loaded,
                "ETL run completed"
            );
            println!("✅ ETL run completed: {} records", report.records_loaded);
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
