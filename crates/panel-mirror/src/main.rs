//! Expert Panel Mirror - Main Entry Point

mod settings;

use anyhow::Context;
use expert_display::{DisplaySnapshot, DisplayStateMachine};
use expert_protocol::{ProtocolDriver, TtyLink};
use settings::Settings;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Capacity of the push channel; a slow consumer drops updates rather
/// than stalling the poll loop
const PUSH_CHANNEL_CAPACITY: usize = 16;

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Expert Panel Mirror v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("loading configuration")?;
    info!("Mirroring display on {}", settings.serial_port);

    let link = TtyLink::new(&settings.serial_port).context("configuring serial link")?;
    let driver = ProtocolDriver::new(link);

    // Setup failure is not fatal: the device may simply be unplugged.
    // Every poll reopens the port, so the next cycle retries anyway.
    if let Err(e) = driver.setup().await {
        error!("Serial setup failed, will retry on next poll: {}", e);
    }

    if settings.power_on_at_start {
        info!("Power-on requested, this takes about three seconds");
        if let Err(e) = driver.power_on().await {
            warn!("Power-on sequence failed: {}", e);
        }
    }

    let (push_tx, push_rx) = mpsc::channel::<DisplaySnapshot>(PUSH_CHANNEL_CAPACITY);
    tokio::spawn(publish_changes(push_rx));

    let mut state = DisplayStateMachine::new(push_tx);
    let mut ticker = tokio::time::interval(Duration::from_millis(settings.poll_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        state.poll(&driver).await;
    }
}

/// Consume the push channel, the boundary where display changes leave
/// this process.
async fn publish_changes(mut rx: mpsc::Receiver<DisplaySnapshot>) {
    while let Some(snapshot) = rx.recv().await {
        match serde_json::to_string(&snapshot) {
            Ok(json) => info!(offline = snapshot.device_offline(), "Display changed: {}", json),
            Err(e) => warn!("Snapshot serialization failed: {}", e),
        }
    }
}
