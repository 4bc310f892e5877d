//! Expert Serial Protocol Implementation
//!
//! This crate provides async serial communication with the SPE Expert
//! amplifier control unit. It implements the vendor request/response
//! framing, exclusive half-duplex port access and the control-line
//! power-button sequence.

mod driver;
mod error;
mod frame;
mod link;

pub use driver::ProtocolDriver;
pub use error::LinkError;
pub use frame::CommandFrame;
pub use link::{LinkSettings, SerialLink, TtyLink};

/// Command codes understood by the device
pub mod command {
    /// Query the front-panel display contents
    pub const DISPLAY_STATUS: u8 = 0x80;
}
