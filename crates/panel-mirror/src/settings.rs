//! Process Configuration

use serde::Deserialize;

/// Runtime settings for the panel mirror daemon
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Serial device the Expert is attached to (e.g. `/dev/ttyUSB0`)
    pub serial_port: String,
    /// Poll interval for the display query in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Drive the power-button sequence before the first poll
    #[serde(default)]
    pub power_on_at_start: bool,
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Settings {
    /// Load settings from an optional `panel-mirror.toml` next to the
    /// process, overridden by `EXPERT_*` environment variables.
    ///
    /// A missing serial port identifier fails here, at startup, rather
    /// than surfacing as a runtime fault later.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("panel-mirror").required(false))
            .add_source(config::Environment::with_prefix("EXPERT"))
            .build()?
            .try_deserialize()
    }
}
