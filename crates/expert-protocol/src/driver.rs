//! Protocol Driver
//!
//! Executes one request/response exchange per call over an exclusively
//! held serial link and drives the control-line power-button sequence.

use crate::error::LinkError;
use crate::frame::CommandFrame;
use crate::link::{LinkSettings, SerialLink};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Hold time for each power-button pulse
const POWER_PULSE: Duration = Duration::from_secs(1);

/// Number of power-button pulses
const POWER_PULSES: u32 = 3;

/// Driver for the Expert request/response protocol.
///
/// The link is a single half-duplex session; overlapping open/write/read
/// sequences corrupt framing. The driver therefore keeps the link behind
/// a mutex and holds it across the whole open-write-read-close cycle, so
/// concurrent callers serialize.
pub struct ProtocolDriver<L: SerialLink> {
    link: Mutex<L>,
    settings: LinkSettings,
}

impl<L: SerialLink> ProtocolDriver<L> {
    /// Create a driver with the device's default line parameters
    pub fn new(link: L) -> Self {
        Self::with_settings(link, LinkSettings::default())
    }

    /// Create a driver with explicit line parameters
    pub fn with_settings(link: L, settings: LinkSettings) -> Self {
        Self {
            link: Mutex::new(link),
            settings,
        }
    }

    /// Configure the link and verify the port can be opened.
    ///
    /// Leaves the control lines in the idle rest state (RTS cleared, DTR
    /// asserted). A failure is returned to the caller, never escalated;
    /// the next `exchange` starts from scratch anyway.
    pub async fn setup(&self) -> Result<(), LinkError> {
        let mut link = self.link.lock().await;
        link.configure(&self.settings);
        link.open().await?;
        let rested = link.set_control_lines(true, false).await;
        link.close().await;
        if rested.is_ok() {
            info!("Serial link configured at {} baud", self.settings.baud_rate);
        }
        rested
    }

    /// Execute one command/response exchange.
    ///
    /// Opens the port, writes the 6-byte request frame, reads exactly
    /// `response_len` bytes and closes the port again. Once opened, the
    /// port is closed on every exit path. A failure means "no data
    /// available"; partial reads are never surfaced.
    pub async fn exchange(&self, command: u8, response_len: usize) -> Result<Vec<u8>, LinkError> {
        let mut link = self.link.lock().await;
        link.open().await?;
        let response = transact(&mut *link, command, response_len, &self.settings).await;
        link.close().await;
        if let Err(ref e) = response {
            warn!("Exchange for command {:#04x} failed: {}", command, e);
        }
        response
    }

    /// Drive the control-line power-button sequence.
    ///
    /// Three pulses of: leave the idle state (DTR cleared, RTS set), hold
    /// for one second, return to idle. Takes about three seconds of wall
    /// clock and reads no response. A control-line failure aborts the
    /// remaining pulses and is reported, not escalated. Dropping the
    /// future cancels between line transitions with the lock released.
    pub async fn power_on(&self) -> Result<(), LinkError> {
        let mut link = self.link.lock().await;
        link.open().await?;
        info!("Driving power-on sequence ({} pulses)", POWER_PULSES);
        let pulsed = pulse_power(&mut *link).await;
        link.close().await;
        if let Err(ref e) = pulsed {
            warn!("Power-on sequence aborted: {}", e);
        }
        pulsed
    }
}

async fn transact<L: SerialLink>(
    link: &mut L,
    command: u8,
    response_len: usize,
    settings: &LinkSettings,
) -> Result<Vec<u8>, LinkError> {
    let frame = CommandFrame::new(command);
    debug!("Sending command frame {:02X?}", frame.to_bytes());
    link.write_all(&frame.to_bytes()).await?;
    link.read_exact(response_len, Duration::from_millis(settings.read_timeout_ms))
        .await
}

async fn pulse_power<L: SerialLink>(link: &mut L) -> Result<(), LinkError> {
    for _ in 0..POWER_PULSES {
        link.set_control_lines(false, true).await?;
        tokio::time::sleep(POWER_PULSE).await;
        link.set_control_lines(true, false).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    /// Mock link that records sessions and flags overlapping opens
    #[derive(Default)]
    struct MockLink {
        response: Vec<u8>,
        fail_open: bool,
        fail_read: bool,
        fail_lines: bool,
        open: bool,
        session: Arc<AtomicBool>,
        overlap: Arc<AtomicBool>,
        opens: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        writes: Arc<StdMutex<Vec<Vec<u8>>>>,
        lines: Arc<StdMutex<Vec<(bool, bool)>>>,
    }

    impl SerialLink for MockLink {
        fn configure(&mut self, _settings: &LinkSettings) {}

        async fn open(&mut self) -> Result<(), LinkError> {
            if self.fail_open {
                return Err(LinkError::Unavailable);
            }
            if self.session.swap(true, Ordering::SeqCst) {
                self.overlap.store(true, Ordering::SeqCst);
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            self.open = true;
            Ok(())
        }

        async fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
            assert!(self.open, "write on closed link");
            self.writes.lock().unwrap().push(bytes.to_vec());
            tokio::task::yield_now().await;
            Ok(())
        }

        async fn read_exact(&mut self, len: usize, limit: Duration) -> Result<Vec<u8>, LinkError> {
            assert!(self.open, "read on closed link");
            tokio::task::yield_now().await;
            if self.fail_read {
                return Err(LinkError::Timeout(limit.as_millis() as u64));
            }
            assert_eq!(len, self.response.len());
            Ok(self.response.clone())
        }

        async fn set_control_lines(&mut self, dtr: bool, rts: bool) -> Result<(), LinkError> {
            if self.fail_lines {
                return Err(LinkError::Io(std::io::Error::other("lines stuck")));
            }
            self.lines.lock().unwrap().push((dtr, rts));
            Ok(())
        }

        async fn close(&mut self) {
            self.open = false;
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.session.store(false, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_exchange_writes_request_frame() {
        let link = MockLink {
            response: vec![0xAA, 0xAA, 0xAA, 0x00],
            ..Default::default()
        };
        let writes = Arc::clone(&link.writes);
        let driver = ProtocolDriver::new(link);

        let response = driver.exchange(0x80, 4).await.unwrap();
        assert_eq!(response, vec![0xAA, 0xAA, 0xAA, 0x00]);
        assert_eq!(
            writes.lock().unwrap().as_slice(),
            &[vec![0x55, 0x55, 0x55, 0x01, 0x80, 0x80]]
        );
    }

    #[tokio::test]
    async fn test_exchange_fails_when_port_cannot_open() {
        let link = MockLink {
            fail_open: true,
            ..Default::default()
        };
        let driver = ProtocolDriver::new(link);
        let result = driver.exchange(0x80, 371).await;
        assert!(matches!(result, Err(LinkError::Unavailable)));
    }

    #[tokio::test]
    async fn test_exchange_closes_port_on_read_error() {
        let link = MockLink {
            fail_read: true,
            ..Default::default()
        };
        let session = Arc::clone(&link.session);
        let closes = Arc::clone(&link.closes);
        let driver = ProtocolDriver::new(link);

        let result = driver.exchange(0x80, 371).await;
        assert!(matches!(result, Err(LinkError::Timeout(_))));
        assert!(!session.load(Ordering::SeqCst), "port left open");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_exchanges_serialize() {
        let link = MockLink {
            response: vec![0x00; 8],
            ..Default::default()
        };
        let overlap = Arc::clone(&link.overlap);
        let opens = Arc::clone(&link.opens);
        let driver = Arc::new(ProtocolDriver::new(link));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let driver = Arc::clone(&driver);
            tasks.push(tokio::spawn(async move {
                driver.exchange(0x80, 8).await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert!(!overlap.load(Ordering::SeqCst), "sessions interleaved");
        assert_eq!(opens.load(Ordering::SeqCst), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_pulses_control_lines() {
        let link = MockLink::default();
        let lines = Arc::clone(&link.lines);
        let driver = ProtocolDriver::new(link);

        driver.power_on().await.unwrap();

        // (dtr, rts): leave idle, then back to idle, three times over
        let expected = vec![
            (false, true),
            (true, false),
            (false, true),
            (true, false),
            (false, true),
            (true, false),
        ];
        assert_eq!(*lines.lock().unwrap(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_aborts_on_line_failure() {
        let link = MockLink {
            fail_lines: true,
            ..Default::default()
        };
        let session = Arc::clone(&link.session);
        let lines = Arc::clone(&link.lines);
        let driver = ProtocolDriver::new(link);

        let result = driver.power_on().await;
        assert!(result.is_err());
        assert!(lines.lock().unwrap().is_empty());
        assert!(!session.load(Ordering::SeqCst), "port left open");
    }

    #[tokio::test]
    async fn test_setup_rests_control_lines_and_closes() {
        let link = MockLink::default();
        let lines = Arc::clone(&link.lines);
        let session = Arc::clone(&link.session);
        let driver = ProtocolDriver::new(link);

        driver.setup().await.unwrap();
        assert_eq!(*lines.lock().unwrap(), vec![(true, false)]);
        assert!(!session.load(Ordering::SeqCst));
    }
}
