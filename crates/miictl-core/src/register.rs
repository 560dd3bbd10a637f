//! Addressable chip registers
//!
//! A register is the smallest unit the board firmware can write: a fixed
//! number of payload bytes at a (PHY address, MII register) pair. Fields
//! never write partial registers; they read the full bytes, merge their bit
//! range and write the full bytes back.

use core::fmt;

/// Address of one MII-managed register: PHY address plus register index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterAddress {
    /// PHY address (first command byte)
    pub phy: u8,
    /// MII register index within the PHY (second command byte)
    pub mii: u8,
}

impl RegisterAddress {
    /// Create a new register address
    pub const fn new(phy: u8, mii: u8) -> Self {
        Self { phy, mii }
    }
}

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.phy, self.mii)
    }
}

/// One fixed-width register with its default bytes and touched flag
///
/// Registers are created once during profile construction and never
/// destroyed or re-addressed afterwards; only the byte contents and the
/// touched flag mutate. The touched flag is set the first time any byte is
/// written through a field with `touch = true` and never cleared within a
/// session.
#[derive(Debug, Clone)]
pub struct Register {
    addr: RegisterAddress,
    value: Vec<u8>,
    default: Vec<u8>,
    touched: bool,
}

impl Register {
    /// Create a register of `width` bytes, zero-filled
    pub fn new(addr: RegisterAddress, width: usize) -> Self {
        Self {
            addr,
            value: vec![0; width],
            default: vec![0; width],
            touched: false,
        }
    }

    /// The register's address
    pub fn address(&self) -> RegisterAddress {
        self.addr
    }

    /// Payload width in bytes
    pub fn width(&self) -> usize {
        self.value.len()
    }

    /// Current payload bytes, byte 0 holding bits 0..=7
    pub fn bytes(&self) -> &[u8] {
        &self.value
    }

    /// Whether the current bytes equal the default bytes
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Whether the register has been written through a field this session
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Current value as an integer, little-endian over the payload bytes
    pub fn value(&self) -> u64 {
        self.value
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (8 * i)))
    }

    /// Replace all payload bytes
    ///
    /// The byte count must match the register width; a mismatch is a
    /// programming error in the variant table, not a runtime condition.
    pub fn write(&mut self, bytes: &[u8], touch: bool) {
        assert_eq!(
            bytes.len(),
            self.value.len(),
            "register {} width mismatch",
            self.addr
        );
        self.value.copy_from_slice(bytes);
        if touch {
            self.touched = true;
        }
    }

    /// Replace the register value from an integer, little-endian
    pub fn set_value(&mut self, value: u64, touch: bool) {
        for (i, b) in self.value.iter_mut().enumerate() {
            *b = (value >> (8 * i)) as u8;
        }
        if touch {
            self.touched = true;
        }
    }

    /// Freeze the current bytes as the register's default
    ///
    /// Called once at the end of profile construction, after field defaults
    /// have been applied untouched.
    pub(crate) fn freeze_default(&mut self) {
        self.default.copy_from_slice(&self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_register_is_default_and_untouched() {
        let reg = Register::new(RegisterAddress::new(23, 0), 2);
        assert!(reg.is_default());
        assert!(!reg.is_touched());
        assert_eq!(reg.value(), 0);
    }

    #[test]
    fn write_sets_touched_permanently() {
        let mut reg = Register::new(RegisterAddress::new(23, 0), 2);
        reg.write(&[0x34, 0x12], true);
        assert!(reg.is_touched());
        assert_eq!(reg.value(), 0x1234);

        // Writing the default bytes back does not clear the flag
        reg.write(&[0, 0], true);
        assert!(reg.is_touched());
        assert!(reg.is_default());
    }

    #[test]
    fn untouched_write_leaves_flag_clear() {
        let mut reg = Register::new(RegisterAddress::new(24, 1), 2);
        reg.set_value(0x0001, false);
        assert!(!reg.is_touched());
        assert!(!reg.is_default());

        reg.freeze_default();
        assert!(reg.is_default());
    }

    #[test]
    fn value_is_little_endian() {
        let mut reg = Register::new(RegisterAddress::new(24, 0), 2);
        reg.set_value(0x0102, true);
        assert_eq!(reg.bytes(), &[0x02, 0x01]);
    }

    #[test]
    fn address_ordering_is_phy_then_mii() {
        let a = RegisterAddress::new(23, 19);
        let b = RegisterAddress::new(24, 0);
        assert!(a < b);
        assert!(RegisterAddress::new(23, 2) < a);
    }
}
