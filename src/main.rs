use anyhow::Context;
use clap::Parser;
use iss_tracker::core::cycle::CycleReport;
use iss_tracker::domain::ports::{ConfigProvider, SignalSink};
use iss_tracker::utils::{logger, validation::Validate};
use iss_tracker::{
    CliConfig, ConsoleSink, GeocodingClient, IssLocator, PollingScheduler, TrackerCycle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("🛰️ ISS Tracker ready to launch!");

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if !config.has_observer_location() {
        tracing::warn!("⚠️ No observer location configured, every cycle will report it");
    }

    let locator = IssLocator::with_timeout(config.iss_endpoint(), config.request_timeout())
        .context("failed to build ISS position client")?;
    let geocoder = GeocodingClient::with_timeout(
        config.geocoding_endpoint(),
        config.country_code(),
        config.request_timeout(),
    )
    .context("failed to build geocoding client")?;
    let cycle = TrackerCycle::new(locator, geocoder, config.observer_settings().clone());
    let sink = ConsoleSink::new(cli.output);

    if cli.once {
        let report = cycle.execute().await;
        print_report(&report);
        sink.emit(&report.outcome)
            .context("failed to write signal")?;
        if report.outcome.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut scheduler = PollingScheduler::new(config.polling_interval());
    if let Some(cycles) = cli.cycles {
        scheduler = scheduler.with_max_cycles(cycles);
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let completed = scheduler.run_until(&cycle, &sink, shutdown).await;

    tracing::info!("✅ ISS Tracker stopped after {} cycles", completed);
    Ok(())
}

fn print_report(report: &CycleReport) {
    if let Some(iss) = &report.iss {
        println!("🌍 ISS Current Location:");
        println!("Latitude:  {}", iss.coordinate.latitude());
        println!("Longitude: {}", iss.coordinate.longitude());
        if let Some(timestamp) = iss.timestamp {
            println!("Timestamp: {}", timestamp.to_rfc2822());
        }
    }
    if let (Some(observer), Some(distance)) = (report.observer, report.distance_km) {
        println!("📏 Distance from {}: {} km", observer, distance.round());
    }
    println!("📡 Cycle finished in state {}", report.state);
}
