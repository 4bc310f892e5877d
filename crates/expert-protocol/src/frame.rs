//! Outbound Command Framing

/// Sync bytes opening every request
const SYNC: [u8; 3] = [0x55, 0x55, 0x55];

/// Length byte, fixed for single-command requests
const LENGTH: u8 = 0x01;

/// A 6-byte request frame: three sync bytes, a length byte, the command
/// code and the command code repeated as trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    command: u8,
}

impl CommandFrame {
    /// Create a frame for the given command code
    pub fn new(command: u8) -> Self {
        Self { command }
    }

    /// The command code this frame carries
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Wire representation of the frame
    pub fn to_bytes(&self) -> [u8; 6] {
        [
            SYNC[0],
            SYNC[1],
            SYNC[2],
            LENGTH,
            self.command,
            self.command,
        ]
    }
}
