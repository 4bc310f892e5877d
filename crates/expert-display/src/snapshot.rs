//! Structured Display State

use serde::{Deserialize, Serialize};

/// Front-panel led indicators, indexed MSB first within the led byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Led {
    /// Alarm indicator
    Alarm = 0,
    /// Tune indicator
    Tune = 1,
    /// Set indicator
    Set = 2,
    /// Operate indicator
    Op = 3,
    /// Transmit indicator
    Tx = 4,
    /// Power indicator
    On = 5,
}

/// One decoded front-panel state.
///
/// `leds` holds the raw status bits: the device reports 1 for an
/// extinguished led and 0 for a lit one. Copies of the snapshot are
/// handed to the push channel; nothing is shared by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Led status bits, MSB first
    pub leds: [bool; 8],
    /// The eight 40-column text lines
    pub lines: [String; 8],
    /// Per-column attribute bytes as decimal tokens; bit n marks the
    /// glyph in row n as reverse video
    pub selected: Vec<String>,
}

impl DisplaySnapshot {
    /// Whether the given led is lit (the device signals 0 for lit)
    pub fn led_lit(&self, led: Led) -> bool {
        !self.leds[led as usize]
    }

    /// An all-zero led byte is the device's offline signature
    pub fn device_offline(&self) -> bool {
        self.leds.iter().all(|&bit| !bit)
    }
}
