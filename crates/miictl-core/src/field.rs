//! Typed bit-field views over registers
//!
//! A field maps a semantic configuration value onto specific bits of one or
//! more registers. Several fields may alias bits of the same register, so
//! fields never own register storage; they hold indices into the register
//! arena owned by the chip profile. The register is the single source of
//! truth: a field's current value is always derived on read.

use crate::error::{Error, Result};
use crate::register::Register;

/// Register order for values spanning multiple registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOrder {
    /// First declared register holds the least significant chunk
    LittleEndian,
    /// First declared register holds the most significant chunk
    BigEndian,
}

/// Bit geometry of a field
///
/// The set of kinds is closed; each kind has one extraction and one merge
/// rule. All kinds except `Wide` live within a single register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single bit; when `inverted`, a stored 0 encodes logical true
    Bit {
        /// Bit offset within the register value
        offset: u8,
        /// Stored-as-0-means-true convention
        inverted: bool,
    },
    /// An unsigned integer of `width` bits at `offset`
    Bits {
        /// Bit offset within the register value
        offset: u8,
        /// Width in bits
        width: u8,
    },
    /// One whole payload byte of the register
    Byte {
        /// Byte index, 0 = bits 0..=7
        index: u8,
    },
    /// An unsigned integer spanning consecutively addressed registers
    Wide {
        /// Which declared register holds the least significant chunk
        order: RegisterOrder,
    },
    /// One bit per physical port within one payload byte
    PortMask {
        /// Byte index holding the port bits
        byte: u8,
        /// Whether all bits default to set (allow-all lists) or clear
        all_ports_default: bool,
    },
}

impl FieldKind {
    /// Short kind name used in error messages and listings
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bit { .. } => "bit",
            FieldKind::Bits { .. } => "bits",
            FieldKind::Byte { .. } => "byte",
            FieldKind::Wide { .. } => "wide",
            FieldKind::PortMask { .. } => "port mask",
        }
    }
}

/// A named, typed view over bits of one or more registers
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    regs: Vec<usize>,
    default: u64,
}

/// Largest value representable in `bits` bits
fn max_for_width(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl Field {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: FieldKind,
        regs: Vec<usize>,
        default: u64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            regs,
            default,
        }
    }

    /// Field name, unique within the profile
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's bit geometry
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared default value
    pub fn default(&self) -> u64 {
        self.default
    }

    /// Width of the field in bits, given the register payload width
    pub fn width_bits(&self, reg_width: usize) -> u32 {
        match self.kind {
            FieldKind::Bit { .. } => 1,
            FieldKind::Bits { width, .. } => u32::from(width),
            FieldKind::Byte { .. } | FieldKind::PortMask { .. } => 8,
            FieldKind::Wide { .. } => (8 * reg_width * self.regs.len()) as u32,
        }
    }

    /// Largest value this field can hold
    pub fn max_value(&self, reg_width: usize) -> u64 {
        max_for_width(self.width_bits(reg_width))
    }

    /// Check that the field's geometry fits its backing registers
    pub(crate) fn validate_geometry(&self, reg_width: usize) -> Result<()> {
        let reg_bits = 8 * reg_width as u32;
        let ok = match self.kind {
            FieldKind::Bit { offset, .. } => {
                self.regs.len() == 1 && u32::from(offset) < reg_bits
            }
            FieldKind::Bits { offset, width } => {
                self.regs.len() == 1
                    && width >= 1
                    && u32::from(offset) + u32::from(width) <= reg_bits
            }
            FieldKind::Byte { index } | FieldKind::PortMask { byte: index, .. } => {
                self.regs.len() == 1 && usize::from(index) < reg_width
            }
            FieldKind::Wide { .. } => self.regs.len() >= 2 && self.width_bits(reg_width) <= 64,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidGeometry(self.name.clone()))
        }
    }

    /// Read the semantic value from the backing register(s)
    pub(crate) fn read(&self, arena: &[Register]) -> u64 {
        match self.kind {
            FieldKind::Bit { offset, inverted } => {
                let bit = (arena[self.regs[0]].value() >> offset) & 1;
                if inverted {
                    bit ^ 1
                } else {
                    bit
                }
            }
            FieldKind::Bits { offset, width } => {
                (arena[self.regs[0]].value() >> offset) & max_for_width(u32::from(width))
            }
            FieldKind::Byte { index } | FieldKind::PortMask { byte: index, .. } => {
                u64::from(arena[self.regs[0]].bytes()[usize::from(index)])
            }
            FieldKind::Wide { order } => {
                let reg_bits = 8 * arena[self.regs[0]].width() as u32;
                let mut value = 0u64;
                for (chunk, &ri) in self.chunk_order(order).enumerate() {
                    value |= arena[ri].value() << (chunk as u32 * reg_bits);
                }
                value
            }
        }
    }

    /// Write the semantic value into the backing register(s)
    ///
    /// Validates the value against the declared width before any register
    /// is modified; bits outside the field's range are preserved.
    pub(crate) fn write(&self, arena: &mut [Register], value: u64, touch: bool) -> Result<()> {
        let reg_width = arena[self.regs[0]].width();
        let max = self.max_value(reg_width);
        if value > max {
            return Err(Error::ValueOutOfRange {
                field: self.name.clone(),
                value,
                max,
            });
        }

        match self.kind {
            FieldKind::Bit { offset, inverted } => {
                let stored = if inverted { value ^ 1 } else { value };
                self.merge(arena, 1 << offset, stored << offset, touch);
            }
            FieldKind::Bits { offset, width } => {
                let mask = max_for_width(u32::from(width)) << offset;
                self.merge(arena, mask, value << offset, touch);
            }
            FieldKind::Byte { index } | FieldKind::PortMask { byte: index, .. } => {
                let shift = 8 * u32::from(index);
                self.merge(arena, 0xFF << shift, value << shift, touch);
            }
            FieldKind::Wide { order } => {
                let reg_bits = 8 * reg_width as u32;
                let reg_mask = max_for_width(reg_bits);
                let indices: Vec<usize> = self.chunk_order(order).copied().collect();
                for (chunk, ri) in indices.into_iter().enumerate() {
                    let part = (value >> (chunk as u32 * reg_bits)) & reg_mask;
                    arena[ri].set_value(part, touch);
                }
            }
        }
        Ok(())
    }

    /// Whether any backing register has been touched
    pub(crate) fn is_touched(&self, arena: &[Register]) -> bool {
        self.regs.iter().any(|&ri| arena[ri].is_touched())
    }

    /// Whether the current semantic value equals the declared default
    ///
    /// Deliberately compares values, not register bytes: a touched register
    /// can still coincidentally equal its default.
    pub(crate) fn is_default(&self, arena: &[Register]) -> bool {
        self.read(arena) == self.default
    }

    /// Backing registers in least-significant-chunk-first order
    fn chunk_order(&self, order: RegisterOrder) -> Box<dyn Iterator<Item = &usize> + '_> {
        match order {
            RegisterOrder::LittleEndian => Box::new(self.regs.iter()),
            RegisterOrder::BigEndian => Box::new(self.regs.iter().rev()),
        }
    }

    /// Read-modify-write of the single backing register
    fn merge(&self, arena: &mut [Register], mask: u64, bits: u64, touch: bool) {
        let reg = &mut arena[self.regs[0]];
        let merged = (reg.value() & !mask) | (bits & mask);
        reg.set_value(merged, touch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegisterAddress;

    fn arena(n: usize) -> Vec<Register> {
        (0..n)
            .map(|i| Register::new(RegisterAddress::new(24, i as u8), 2))
            .collect()
    }

    #[test]
    fn bits_round_trip() {
        let mut regs = arena(1);
        let vid = Field::new("VID_0", FieldKind::Bits { offset: 0, width: 12 }, vec![0], 1);

        for v in [0u64, 1, 100, 0xFFF] {
            vid.write(&mut regs, v, true).unwrap();
            assert_eq!(vid.read(&regs), v);
        }
    }

    #[test]
    fn bits_reject_out_of_range() {
        let mut regs = arena(1);
        let vid = Field::new("VID_0", FieldKind::Bits { offset: 0, width: 12 }, vec![0], 1);

        let err = vid.write(&mut regs, 0x1000, true).unwrap_err();
        assert_eq!(
            err,
            Error::ValueOutOfRange {
                field: "VID_0".into(),
                value: 0x1000,
                max: 0xFFF,
            }
        );
        // Nothing was written
        assert_eq!(regs[0].value(), 0);
        assert!(!regs[0].is_touched());
    }

    #[test]
    fn sibling_fields_are_isolated() {
        // Three fields aliasing register (23, 2): the layout of the real
        // VLAN receive-control register.
        let mut regs = arena(1);
        let filter = Field::new(
            "VLAN_INGRESS_FILTER",
            FieldKind::PortMask { byte: 0, all_ports_default: true },
            vec![0],
            0xFF,
        );
        let frm = Field::new("ACCEPTABLE_FRM_TYPE", FieldKind::Bits { offset: 8, width: 2 }, vec![0], 0);
        let rsvd = Field::new("RSVD_VID_0", FieldKind::Bit { offset: 10, inverted: false }, vec![0], 1);

        filter.write(&mut regs, 0xFF, false).unwrap();
        rsvd.write(&mut regs, 1, false).unwrap();

        frm.write(&mut regs, 0b10, true).unwrap();
        assert_eq!(filter.read(&regs), 0xFF);
        assert_eq!(rsvd.read(&regs), 1);
        assert_eq!(frm.read(&regs), 0b10);

        filter.write(&mut regs, 0x04, true).unwrap();
        assert_eq!(frm.read(&regs), 0b10);
        assert_eq!(rsvd.read(&regs), 1);
    }

    #[test]
    fn inverted_bit_stores_zero_for_true() {
        let mut regs = arena(1);
        let bit = Field::new("RSVD_VID_0", FieldKind::Bit { offset: 10, inverted: true }, vec![0], 0);

        bit.write(&mut regs, 1, true).unwrap();
        assert_eq!(bit.read(&regs), 1);
        assert_eq!(regs[0].value() & (1 << 10), 0);

        bit.write(&mut regs, 0, true).unwrap();
        assert_eq!(bit.read(&regs), 0);
        assert_eq!(regs[0].value() & (1 << 10), 1 << 10);
    }

    #[test]
    fn byte_field_preserves_other_byte() {
        let mut regs = arena(1);
        let low = Field::new("LOW", FieldKind::Byte { index: 0 }, vec![0], 0);
        let high = Field::new("HIGH", FieldKind::Byte { index: 1 }, vec![0], 0);

        low.write(&mut regs, 0xAA, true).unwrap();
        high.write(&mut regs, 0x55, true).unwrap();
        assert_eq!(regs[0].bytes(), &[0xAA, 0x55]);
        assert_eq!(low.read(&regs), 0xAA);
    }

    #[test]
    fn wide_field_chunks_little_endian() {
        let mut regs = arena(2);
        let wide = Field::new("COUNTER", FieldKind::Wide { order: RegisterOrder::LittleEndian }, vec![0, 1], 0);

        wide.write(&mut regs, 0xDEAD_BEEF, true).unwrap();
        assert_eq!(regs[0].value(), 0xBEEF);
        assert_eq!(regs[1].value(), 0xDEAD);
        assert_eq!(wide.read(&regs), 0xDEAD_BEEF);
    }

    #[test]
    fn wide_field_chunks_big_endian() {
        let mut regs = arena(2);
        let wide = Field::new("COUNTER", FieldKind::Wide { order: RegisterOrder::BigEndian }, vec![0, 1], 0);

        wide.write(&mut regs, 0xDEAD_BEEF, true).unwrap();
        assert_eq!(regs[0].value(), 0xDEAD);
        assert_eq!(regs[1].value(), 0xBEEF);
        assert_eq!(wide.read(&regs), 0xDEAD_BEEF);
    }

    #[test]
    fn wide_field_wider_than_u64_is_rejected() {
        // 5 x 16-bit registers would need 80 value bits
        let too_wide = Field::new(
            "COUNTER",
            FieldKind::Wide { order: RegisterOrder::LittleEndian },
            vec![0, 1, 2, 3, 4],
            0,
        );
        assert_eq!(
            too_wide.validate_geometry(2),
            Err(Error::InvalidGeometry("COUNTER".into()))
        );

        let at_limit = Field::new(
            "COUNTER",
            FieldKind::Wide { order: RegisterOrder::LittleEndian },
            vec![0, 1, 2, 3],
            0,
        );
        assert!(at_limit.validate_geometry(2).is_ok());
    }

    #[test]
    fn wide_field_rejects_overflow() {
        let mut regs = arena(2);
        let wide = Field::new("COUNTER", FieldKind::Wide { order: RegisterOrder::LittleEndian }, vec![0, 1], 0);

        // 2 x 16-bit registers hold at most 32 bits
        assert!(wide.write(&mut regs, 0x1_0000_0000, true).is_err());
        assert!(wide.write(&mut regs, 0xFFFF_FFFF, true).is_ok());
    }

    #[test]
    fn default_comparison_is_by_value_not_register() {
        let mut regs = arena(1);
        let vid = Field::new("VID_0", FieldKind::Bits { offset: 0, width: 12 }, vec![0], 1);

        vid.write(&mut regs, 1, false).unwrap();
        regs[0].freeze_default();
        assert!(vid.is_default(&regs));
        assert!(!vid.is_touched(&regs));

        // Move away and back: register is touched but the field (and the
        // register) again hold the default value.
        vid.write(&mut regs, 5, true).unwrap();
        assert!(!vid.is_default(&regs));
        vid.write(&mut regs, 1, true).unwrap();
        assert!(vid.is_default(&regs));
        assert!(vid.is_touched(&regs));
    }
}
