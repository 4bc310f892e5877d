//! Display Frame Decoder
//!
//! Turns the raw display-status response into its canonical string form:
//! an 8-bit led status, eight 40-glyph rows and the per-column attribute
//! bytes, joined by the `,,` field separator.

use crate::charmap;
use crate::error::DecodeError;
use std::fmt::Write;
use std::ops::Range;

/// Marker opening every valid display response
pub const FRAME_START: [u8; 3] = [0xAA, 0xAA, 0xAA];

/// Field separator between the led segment, rows and attributes
pub const FIELD_SEP: &str = ",,";

/// Size of the display-status response in bytes
pub const DISPLAY_RESPONSE_LEN: usize = 371;

/// Columns per display row
pub const ROW_WIDTH: usize = 40;

/// Display rows
pub const ROW_COUNT: usize = 8;

/// Offset of the led status byte
const LED_OFFSET: usize = 8;

/// Display body: 8 rows x 40 columns of glyph bytes
const GLYPHS: Range<usize> = 9..329;

/// One attribute byte per column; bit n marks the glyph in row n as
/// reverse video
const ATTRIBUTES: Range<usize> = 329..369;

/// Decode a raw display response into its canonical string.
///
/// The led byte is rendered MSB first, zero padded to 8 characters. Bit
/// semantics, indexed from the MSB: Alarm, Tune, Set, Op, Tx, On, with 1
/// meaning the led is off; an all-zero byte means the device is offline.
///
/// Pure and deterministic. Every access into `raw` is bounds checked; a
/// short buffer yields [`DecodeError::Malformed`] instead of a fault.
pub fn decode(raw: &[u8]) -> Result<String, DecodeError> {
    let marker = raw.get(..3).ok_or(DecodeError::Malformed)?;
    if marker != FRAME_START.as_slice() {
        return Err(DecodeError::CommunicationError);
    }
    if raw.len() < DISPLAY_RESPONSE_LEN {
        return Err(DecodeError::Malformed);
    }

    let led = raw.get(LED_OFFSET).ok_or(DecodeError::Malformed)?;
    let glyphs = raw.get(GLYPHS).ok_or(DecodeError::Malformed)?;
    let attributes = raw.get(ATTRIBUTES).ok_or(DecodeError::Malformed)?;

    let mut canonical = String::with_capacity(DISPLAY_RESPONSE_LEN + 64);
    let _ = write!(canonical, "{led:08b}");

    for row in glyphs.chunks(ROW_WIDTH) {
        canonical.push_str(FIELD_SEP);
        for &byte in row {
            canonical.push_str(charmap::glyph(byte));
        }
    }

    canonical.push_str(FIELD_SEP);
    let mut first = true;
    for &byte in attributes {
        if !first {
            canonical.push(';');
        }
        let _ = write!(canonical, "{byte}");
        first = false;
    }

    Ok(canonical)
}
