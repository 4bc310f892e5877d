//! Display State Machine
//!
//! Polls the device once per cycle, detects changes against the last
//! accepted canonical string and republishes a structured snapshot only
//! when the panel content actually moved.

use crate::decoder::{self, DISPLAY_RESPONSE_LEN, FIELD_SEP, ROW_COUNT, ROW_WIDTH};
use crate::error::{DecodeError, ParseWarning, ERROR_TOKEN};
use crate::snapshot::DisplaySnapshot;
use expert_protocol::{command, ProtocolDriver, SerialLink};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Placeholder for "nothing decoded yet"; guaranteed to differ from any
/// real canonical string so the first successful poll always publishes.
const INITIAL_STATE: &str = " ";

/// Change-detecting poller for the front-panel display.
///
/// Owns the last accepted canonical string and the last published
/// snapshot; the driver only borrows the state machine per poll, so no
/// global state is involved.
pub struct DisplayStateMachine {
    last_decoded: String,
    snapshot: DisplaySnapshot,
    publisher: mpsc::Sender<DisplaySnapshot>,
}

impl DisplayStateMachine {
    /// Create a state machine publishing changes to `publisher`
    pub fn new(publisher: mpsc::Sender<DisplaySnapshot>) -> Self {
        Self {
            last_decoded: INITIAL_STATE.to_string(),
            snapshot: DisplaySnapshot::default(),
            publisher,
        }
    }

    /// Last published snapshot. Never blocks, never touches the link.
    pub fn snapshot(&self) -> &DisplaySnapshot {
        &self.snapshot
    }

    /// Run one poll cycle against the device.
    ///
    /// A link failure or decode error becomes the error message itself,
    /// so a connectivity gap is published once like any other display
    /// change instead of being silently dropped. The push channel sees at
    /// most one snapshot per cycle, and only on change.
    pub async fn poll<L: SerialLink>(&mut self, driver: &ProtocolDriver<L>) {
        let canonical = match driver
            .exchange(command::DISPLAY_STATUS, DISPLAY_RESPONSE_LEN)
            .await
        {
            Ok(raw) => decoder::decode(&raw).unwrap_or_else(|e| {
                warn!("Display decode failed: {}", e);
                e.to_string()
            }),
            Err(e) => {
                error!("Display exchange failed: {}", e);
                DecodeError::NotConnected.to_string()
            }
        };

        if canonical == self.last_decoded {
            return;
        }
        debug!("Display content changed");

        self.last_decoded = canonical;
        self.apply_canonical();
        if let Err(e) = self.publisher.try_send(self.snapshot.clone()) {
            warn!("Display publish dropped: {}", e);
        }
    }

    /// Re-parse the accepted canonical string into the snapshot.
    ///
    /// Commits atomically: if the string is the startup placeholder, an
    /// error state or structurally short, the previously published
    /// snapshot stays untouched.
    fn apply_canonical(&mut self) {
        if self.last_decoded.chars().count() <= 1 {
            return;
        }
        match parse_canonical(&self.last_decoded) {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(reason) => warn!("Keeping previous snapshot: {}", reason),
        }
    }
}

/// Parse a canonical string into a fresh snapshot.
fn parse_canonical(canonical: &str) -> Result<DisplaySnapshot, ParseWarning> {
    let fields: Vec<&str> = canonical.split(FIELD_SEP).collect();
    let expected = ROW_COUNT + 2;
    if fields.len() < expected {
        return Err(ParseWarning::MissingFields {
            expected,
            actual: fields.len(),
        });
    }
    if fields[0].starts_with(ERROR_TOKEN) {
        return Err(ParseWarning::ErrorState);
    }

    let mut leds = [false; 8];
    let mut bits = fields[0].chars();
    for slot in leds.iter_mut() {
        match bits.next() {
            Some(bit) => *slot = bit == '1',
            None => return Err(ParseWarning::ShortLedSegment),
        }
    }

    let mut lines: [String; 8] = Default::default();
    for (row, line) in lines.iter_mut().enumerate() {
        let glyphs: String = fields[row + 1].chars().take(ROW_WIDTH).collect();
        if glyphs.chars().count() < ROW_WIDTH {
            return Err(ParseWarning::ShortRow {
                row: row + 1,
                width: ROW_WIDTH,
            });
        }
        *line = glyphs;
    }

    let selected = fields[ROW_COUNT + 1]
        .split(';')
        .map(str::to_string)
        .collect();

    Ok(DisplaySnapshot {
        leds,
        lines,
        selected,
    })
}
