//! Firmware write commands
//!
//! One command carries one register write to the board firmware:
//! `[phy, mii, byte_0, .., byte_{n-1}]`. No checksum, length prefix or
//! framing is added here; the transport layer owns that.

use core::fmt;

/// One register write for the board firmware
///
/// The derived ordering is the natural tuple order (phy, then mii, then
/// payload bytes), which is what the command generator sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Command {
    /// PHY address
    pub phy: u8,
    /// MII register index
    pub mii: u8,
    /// Register payload bytes, byte 0 first
    pub data: Vec<u8>,
}

impl Command {
    /// Create a new command
    pub fn new(phy: u8, mii: u8, data: Vec<u8>) -> Self {
        Self { phy, mii, data }
    }

    /// Flatten into the raw byte sequence sent on the wire
    pub fn flatten(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.data.len());
        out.push(self.phy);
        out.push(self.mii);
        out.extend_from_slice(&self.data);
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}", self.phy, self.mii)?;
        for b in &self.data {
            write!(f, ", {}", b)?;
        }
        write!(f, "]")
    }
}
