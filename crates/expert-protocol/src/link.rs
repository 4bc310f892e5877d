//! Serial Link Abstraction
//!
//! The transport seam between the protocol driver and the physical port.
//! `TtyLink` is the tokio-serial implementation; tests substitute mock
//! links behind the same trait.

use crate::error::LinkError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{
    DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits,
};
use tracing::{debug, trace};

/// Line parameters for the Expert control link
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Baud rate (the device talks at 115200)
    pub baud_rate: u32,
    /// Data bits per character
    pub data_bits: u8,
    /// Stop bits per character
    pub stop_bits: u8,
    /// Blocking-read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Write timeout in milliseconds
    pub write_timeout_ms: u64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: 8,
            stop_bits: 1,
            read_timeout_ms: 100,
            write_timeout_ms: 100,
        }
    }
}

/// Transport contract for one half-duplex serial session.
///
/// Parity and flow control are always off for this device, so they are
/// not part of [`LinkSettings`]. Implementations are not reentrant; the
/// [`ProtocolDriver`](crate::ProtocolDriver) serializes all access.
#[allow(async_fn_in_trait)]
pub trait SerialLink: Send {
    /// Replace the line parameters; takes effect on the next `open`.
    fn configure(&mut self, settings: &LinkSettings);

    /// Open the port.
    async fn open(&mut self) -> Result<(), LinkError>;

    /// Write all bytes, honouring the configured write timeout.
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Read exactly `len` bytes within `limit`.
    async fn read_exact(&mut self, len: usize, limit: Duration) -> Result<Vec<u8>, LinkError>;

    /// Drive the DTR and RTS control lines.
    async fn set_control_lines(&mut self, dtr: bool, rts: bool) -> Result<(), LinkError>;

    /// Close the port. Closing an already closed port is a no-op.
    async fn close(&mut self);
}

/// Serial link backed by a real tty device
pub struct TtyLink {
    path: String,
    settings: LinkSettings,
    stream: Option<SerialStream>,
}

impl TtyLink {
    /// Create a link for the given device path (e.g. `/dev/ttyUSB0`).
    ///
    /// An empty path means no port was configured, which is a setup
    /// failure rather than something to discover at poll time.
    pub fn new(path: &str) -> Result<Self, LinkError> {
        if path.trim().is_empty() {
            return Err(LinkError::NotConfigured);
        }
        Ok(Self {
            path: path.to_string(),
            settings: LinkSettings::default(),
            stream: None,
        })
    }

    fn builder(&self) -> tokio_serial::SerialPortBuilder {
        tokio_serial::new(self.path.as_str(), self.settings.baud_rate)
            .data_bits(data_bits(self.settings.data_bits))
            .stop_bits(stop_bits(self.settings.stop_bits))
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(self.settings.read_timeout_ms))
    }
}

impl SerialLink for TtyLink {
    fn configure(&mut self, settings: &LinkSettings) {
        self.settings = settings.clone();
    }

    async fn open(&mut self) -> Result<(), LinkError> {
        match self.builder().open_native_async() {
            Ok(stream) => {
                trace!("Opened {}", self.path);
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                debug!("Open failed on {}: {}", self.path, e);
                Err(LinkError::Unavailable)
            }
        }
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let limit_ms = self.settings.write_timeout_ms;
        let stream = self.stream.as_mut().ok_or(LinkError::Unavailable)?;
        timeout(Duration::from_millis(limit_ms), stream.write_all(bytes))
            .await
            .map_err(|_| LinkError::Timeout(limit_ms))??;
        Ok(())
    }

    async fn read_exact(&mut self, len: usize, limit: Duration) -> Result<Vec<u8>, LinkError> {
        let stream = self.stream.as_mut().ok_or(LinkError::Unavailable)?;
        let mut buf = vec![0u8; len];
        timeout(limit, stream.read_exact(&mut buf))
            .await
            .map_err(|_| LinkError::Timeout(limit.as_millis() as u64))??;
        Ok(buf)
    }

    async fn set_control_lines(&mut self, dtr: bool, rts: bool) -> Result<(), LinkError> {
        let stream = self.stream.as_mut().ok_or(LinkError::Unavailable)?;
        // The cleared line drops before the other is raised, matching the
        // button emulation described in the vendor manual.
        if dtr {
            stream.write_request_to_send(rts)?;
            stream.write_data_terminal_ready(dtr)?;
        } else {
            stream.write_data_terminal_ready(dtr)?;
            stream.write_request_to_send(rts)?;
        }
        Ok(())
    }

    async fn close(&mut self) {
        if self.stream.take().is_some() {
            trace!("Closed {}", self.path);
        }
    }
}

fn data_bits(bits: u8) -> DataBits {
    match bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    }
}

fn stop_bits(bits: u8) -> StopBits {
    match bits {
        2 => StopBits::Two,
        _ => StopBits::One,
    }
}
