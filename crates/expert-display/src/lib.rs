//! Expert Front-Panel Display Decoding
//!
//! This crate turns the raw 371-byte display-status response into a
//! canonical string form, tracks changes across poll cycles and
//! republishes a structured snapshot whenever the panel content moves.

pub mod charmap;
mod decoder;
mod error;
mod snapshot;
mod state;

pub use decoder::{decode, DISPLAY_RESPONSE_LEN, FIELD_SEP, FRAME_START, ROW_COUNT, ROW_WIDTH};
pub use error::{DecodeError, ParseWarning, ERROR_TOKEN};
pub use snapshot::{DisplaySnapshot, Led};
pub use state::DisplayStateMachine;
