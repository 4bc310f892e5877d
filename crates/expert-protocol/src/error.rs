//! Serial Link Error Types

use thiserror::Error;

/// Errors that can occur on the serial link
#[derive(Debug, Error)]
pub enum LinkError {
    /// No serial port identifier configured
    #[error("Serial port is not set")]
    NotConfigured,

    /// The port could not be opened
    #[error("Com port is not connected")]
    Unavailable,

    /// I/O failure during write or read
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Timed out waiting for the device
    #[error("Timeout waiting for device after {0}ms")]
    Timeout(u64),

    /// Underlying serial stack rejected the configuration
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
}
