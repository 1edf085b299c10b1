use color_eyre::{eyre::eyre, Result};
use leverdrive::config::{AppConfig, ConfigError};
use leverdrive::simulation::{HandScript, Simulation};
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = setup_config().await?;
    info!(
        "Running {} frames at {} Hz",
        config.simulation.frames, config.simulation.frame_rate
    );

    let mut simulation = Simulation::new(&config, HandScript::demo())
        .map_err(|e| eyre!("Failed to build simulation: {}", e))?;

    // Edge events are logged off the frame loop
    let mut lever_events = simulation.lever_mut().subscribe();
    let event_logger = tokio::spawn(async move {
        while let Some(event) = lever_events.recv().await {
            info!("Lever event: {:?}", event);
        }
    });

    let frame_rate = u64::from(config.simulation.frame_rate.max(1));
    let mut ticker = tokio::time::interval(Duration::from_secs_f32(
        config.simulation.delta_seconds(),
    ));

    for _ in 0..config.simulation.frames {
        ticker.tick().await;
        let report = simulation.step();

        if report.frame % frame_rate == 0 {
            info!(
                "t={}s lever={} ({}) knob={} position={:.2?} yaw={:.1}",
                report.frame / frame_rate,
                report.lever_value,
                report.lever_position,
                report.knob_value,
                report.pose.position,
                report.pose.yaw_degrees()
            );
        }
    }

    let lever = simulation.shutdown();
    info!("Lever parked at {} ({})", lever.value(), lever.position());

    // Dropping the lever closes the event channel
    drop(lever);
    event_logger.await?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

async fn setup_config() -> Result<AppConfig> {
    let path = match AppConfig::default_path() {
        Ok(path) => path,
        Err(ConfigError::NoConfigDir) => {
            warn!("No config directory available, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    // A read-only config location is not fatal
    if let Err(e) = AppConfig::ensure_default(&path).await {
        warn!("Unable to write default config: {}", e);
    }

    AppConfig::load_or_default(&path)
        .await
        .map_err(|e| eyre!("Failed to load config {}: {}", path.display(), e))
}
