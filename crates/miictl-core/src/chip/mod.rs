//! Chip profiles: per-variant assembly of ports, registers and fields
//!
//! A [`SwitchChip`] is built once per session from a [`Variant`] descriptor
//! and is structurally immutable afterwards; only register contents and
//! touched flags change. Callers address configuration purely by field name
//! and port label, never by raw register address, so they stay
//! variant-agnostic.

mod features;
mod ip175g;

pub use features::Features;

use std::collections::HashMap;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::field::{Field, FieldKind};
use crate::port::Port;
use crate::register::{Register, RegisterAddress};

/// Number of VLAN table slots the firmware exposes
pub const VLAN_SLOTS: usize = 16;

/// Name of the derived VLAN validity bitmap field
pub const VLAN_VALID: &str = "VLAN_VALID";

/// Field name of VLAN ID slot `slot` (hex-indexed, `VID_0`..`VID_F`)
pub fn vid_field_name(slot: usize) -> String {
    format!("VID_{:X}", slot)
}

/// Field name of the membership mask for VLAN slot `slot`
pub fn vlan_member_field_name(slot: usize) -> String {
    format!("VLAN_MEMBER_{:X}", slot)
}

/// Board variant descriptor
///
/// Variants differ in port count and in which optional registers (and
/// therefore fields) exist. One construction routine consumes the
/// descriptor; there is no per-variant dispatch after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Full 5-port Switchblox
    Switchblox,
    /// 3-port Switchblox Nano
    SwitchbloxNano,
}

impl Variant {
    /// Marketing name of the board
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Switchblox => "Switchblox",
            Variant::SwitchbloxNano => "Switchblox Nano",
        }
    }
}

/// A fully assembled chip profile
///
/// Owns the register arena (declaration order), the field table, the port
/// list and the feature flags for one board variant. Fields reference
/// registers by arena index, so several fields may alias bits of the same
/// register without duplicating storage.
#[derive(Debug, Clone)]
pub struct SwitchChip {
    variant: Variant,
    registers: Vec<Register>,
    reg_index: HashMap<RegisterAddress, usize>,
    fields: Vec<Field>,
    field_index: HashMap<String, usize>,
    ports: Vec<Port>,
    features: Features,
}

impl SwitchChip {
    /// Build the profile for a board variant
    ///
    /// All registers and fields are declared and bit/byte reset values are
    /// written (untouched) before this returns; table and port-mask
    /// registers stay zeroed. A fresh profile is all-default and generates
    /// no commands under default elision.
    pub fn new(variant: Variant) -> Result<Self> {
        ip175g::build(variant)
    }

    /// The variant this profile was built for
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The board's physical ports, in label order
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Feature flags declared by the variant
    pub fn features(&self) -> Features {
        self.features
    }

    /// Whether the variant declares all of the given features
    pub fn has_feature(&self, features: Features) -> bool {
        self.features.contains(features)
    }

    /// All field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Result<&Field> {
        let &idx = self
            .field_index
            .get(name)
            .ok_or_else(|| Error::UnknownField(name.to_owned()))?;
        Ok(&self.fields[idx])
    }

    /// Look up a port by its board label
    pub fn port(&self, label: &str) -> Result<&Port> {
        self.ports
            .iter()
            .find(|p| p.label() == label)
            .ok_or_else(|| Error::UnknownPort(label.to_owned()))
    }

    /// Read an integer field (`Bits`, `Byte` or `Wide`)
    pub fn value(&self, name: &str) -> Result<u64> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::Bits { .. } | FieldKind::Byte { .. } | FieldKind::Wide { .. } => {
                Ok(field.read(&self.registers))
            }
            _ => Err(Error::WrongKind {
                field: name.to_owned(),
                expected: "integer",
            }),
        }
    }

    /// Write an integer field (`Bits`, `Byte` or `Wide`)
    pub fn set_value(&mut self, name: &str, value: u64) -> Result<()> {
        self.set_value_raw(name, value, true)
    }

    /// Read a single-bit field
    pub fn flag(&self, name: &str) -> Result<bool> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::Bit { .. } => Ok(field.read(&self.registers) != 0),
            _ => Err(Error::WrongKind {
                field: name.to_owned(),
                expected: "bit",
            }),
        }
    }

    /// Write a single-bit field
    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<()> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::Bit { .. } => {}
            _ => {
                return Err(Error::WrongKind {
                    field: name.to_owned(),
                    expected: "bit",
                })
            }
        }
        let field = field.clone();
        field.write(&mut self.registers, u64::from(value), true)
    }

    /// Add a port to a port-mask field
    pub fn add_port(&mut self, name: &str, port: &str) -> Result<()> {
        let bit = self.port(port)?.bit();
        let (field, raw) = self.port_mask(name)?;
        field.write(&mut self.registers, raw | (1 << bit), true)
    }

    /// Remove a port from a port-mask field
    pub fn remove_port(&mut self, name: &str, port: &str) -> Result<()> {
        let bit = self.port(port)?.bit();
        let (field, raw) = self.port_mask(name)?;
        field.write(&mut self.registers, raw & !(1 << bit), true)
    }

    /// Clear all bits of a port-mask field
    pub fn clear_ports(&mut self, name: &str) -> Result<()> {
        let (field, _) = self.port_mask(name)?;
        field.write(&mut self.registers, 0, true)
    }

    /// Whether a port's bit is set in a port-mask field
    pub fn contains_port(&self, name: &str, port: &str) -> Result<bool> {
        let bit = self.port(port)?.bit();
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::PortMask { .. } => Ok(field.read(&self.registers) & (1 << bit) != 0),
            _ => Err(Error::WrongKind {
                field: name.to_owned(),
                expected: "port mask",
            }),
        }
    }

    /// The ports whose bits are set in a port-mask field
    pub fn ports_in(&self, name: &str) -> Result<Vec<&Port>> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::PortMask { .. } => {}
            _ => {
                return Err(Error::WrongKind {
                    field: name.to_owned(),
                    expected: "port mask",
                })
            }
        }
        let raw = field.read(&self.registers);
        Ok(self
            .ports
            .iter()
            .filter(|p| raw & (1 << p.bit()) != 0)
            .collect())
    }

    /// Whether any register backing the field has been written this session
    pub fn field_is_touched(&self, name: &str) -> Result<bool> {
        Ok(self.field(name)?.is_touched(&self.registers))
    }

    /// Whether the field's current value equals its declared default
    pub fn field_is_default(&self, name: &str) -> Result<bool> {
        Ok(self.field(name)?.is_default(&self.registers))
    }

    /// Raw value of any field kind, for listings
    pub fn raw_value(&self, name: &str) -> Result<u64> {
        Ok(self.field(name)?.read(&self.registers))
    }

    /// Declared registers, in declaration order
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Generate the firmware command stream for the current state
    ///
    /// First synthesizes the derived VLAN validity bitmap from the number
    /// of touched VID slots, then serializes one command per register,
    /// skipping default-valued registers when `leave_out_default` and
    /// untouched registers when `only_touched`. The result is sorted by
    /// (phy, mii, payload) so identical state always yields identical
    /// output.
    pub fn commands(&mut self, leave_out_default: bool, only_touched: bool) -> Vec<Command> {
        self.sync_vlan_valid();

        let mut out: Vec<Command> = self
            .registers
            .iter()
            .filter(|r| !(leave_out_default && r.is_default()))
            .filter(|r| !(only_touched && !r.is_touched()))
            .map(|r| Command::new(r.address().phy, r.address().mii, r.bytes().to_vec()))
            .collect();
        out.sort();
        out
    }

    /// Keep the VLAN validity bitmap consistent with the VID slots
    ///
    /// The firmware infers "how many VLANs are configured" from a
    /// contiguous run of low bits in VLAN_VALID, so the bitmap is
    /// `(1 << count) - 1` where `count` is the number of touched VID
    /// slots. Callers are expected to populate slots contiguously from
    /// slot 0; a sparse population is logged, not repaired.
    fn sync_vlan_valid(&mut self) {
        let mut touched = 0usize;
        let mut highest = 0usize;
        for slot in 0..VLAN_SLOTS {
            let name = vid_field_name(slot);
            if let Some(&idx) = self.field_index.get(&name) {
                if self.fields[idx].is_touched(&self.registers) {
                    touched += 1;
                    highest = slot;
                }
            }
        }

        if touched == 0 || !self.field_index.contains_key(VLAN_VALID) {
            return;
        }
        if highest + 1 != touched {
            log::warn!(
                "VID slots are not populated contiguously from slot 0 \
                 ({} touched, highest slot {}); firmware will only see {} VLAN(s)",
                touched,
                highest,
                touched
            );
        }
        let bitmap = (1u64 << touched) - 1;
        // VLAN_VALID is an ordinary 16-bit field; this is a touched write.
        self.set_value_raw(VLAN_VALID, bitmap, true)
            .expect("VLAN_VALID bitmap fits its field");
    }

    fn set_value_raw(&mut self, name: &str, value: u64, touch: bool) -> Result<()> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::Bits { .. } | FieldKind::Byte { .. } | FieldKind::Wide { .. } => {}
            _ => {
                return Err(Error::WrongKind {
                    field: name.to_owned(),
                    expected: "integer",
                })
            }
        }
        let field = field.clone();
        field.write(&mut self.registers, value, touch)
    }

    fn port_mask(&self, name: &str) -> Result<(Field, u64)> {
        let field = self.field(name)?;
        match field.kind() {
            FieldKind::PortMask { .. } => {}
            _ => {
                return Err(Error::WrongKind {
                    field: name.to_owned(),
                    expected: "port mask",
                })
            }
        }
        let raw = field.read(&self.registers);
        Ok((field.clone(), raw))
    }
}

/// Incremental profile builder used by the variant tables
///
/// Enforces the construction invariants: unique register addresses, unique
/// field names, fields bound only to already-declared registers, geometry
/// within register width. `finish` applies bit and byte field defaults
/// with `touch = false` and then freezes register defaults.
pub(crate) struct ChipBuilder {
    variant: Variant,
    reg_width: usize,
    registers: Vec<Register>,
    reg_index: HashMap<RegisterAddress, usize>,
    fields: Vec<Field>,
    field_index: HashMap<String, usize>,
    ports: Vec<Port>,
    features: Features,
}

impl ChipBuilder {
    pub(crate) fn new(
        variant: Variant,
        reg_width: usize,
        features: Features,
        ports: Vec<Port>,
    ) -> Self {
        Self {
            variant,
            reg_width,
            registers: Vec::new(),
            reg_index: HashMap::new(),
            fields: Vec::new(),
            field_index: HashMap::new(),
            ports,
            features,
        }
    }

    pub(crate) fn add_register(&mut self, addr: RegisterAddress) -> Result<()> {
        if self.reg_index.contains_key(&addr) {
            return Err(Error::DuplicateRegister(addr));
        }
        self.reg_index.insert(addr, self.registers.len());
        self.registers.push(Register::new(addr, self.reg_width));
        Ok(())
    }

    pub(crate) fn add_field(
        &mut self,
        name: &str,
        kind: FieldKind,
        addrs: &[RegisterAddress],
        default: u64,
    ) -> Result<()> {
        if self.field_index.contains_key(name) {
            return Err(Error::DuplicateField(name.to_owned()));
        }
        if addrs.is_empty() {
            return Err(Error::EmptyField(name.to_owned()));
        }
        let mut regs = Vec::with_capacity(addrs.len());
        for addr in addrs {
            let &idx = self
                .reg_index
                .get(addr)
                .ok_or_else(|| Error::MissingRegister {
                    field: name.to_owned(),
                    addr: *addr,
                })?;
            regs.push(idx);
        }
        let field = Field::new(name, kind, regs, default);
        field.validate_geometry(self.reg_width)?;
        self.field_index.insert(name.to_owned(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    pub(crate) fn add_bit(
        &mut self,
        name: &str,
        addr: RegisterAddress,
        offset: u8,
        default: bool,
    ) -> Result<()> {
        self.add_field(
            name,
            FieldKind::Bit { offset, inverted: false },
            &[addr],
            u64::from(default),
        )
    }

    pub(crate) fn add_bits(
        &mut self,
        name: &str,
        addr: RegisterAddress,
        offset: u8,
        width: u8,
        default: u64,
    ) -> Result<()> {
        self.add_field(name, FieldKind::Bits { offset, width }, &[addr], default)
    }

    pub(crate) fn add_port_mask(
        &mut self,
        name: &str,
        addr: RegisterAddress,
        byte: u8,
        all_ports_default: bool,
    ) -> Result<()> {
        let default = if all_ports_default { 0xFF } else { 0x00 };
        self.add_field(
            name,
            FieldKind::PortMask { byte, all_ports_default },
            &[addr],
            default,
        )
    }

    pub(crate) fn finish(mut self) -> Result<SwitchChip> {
        // Materialize bit and byte reset values without flagging anything
        // as a user change, then freeze register defaults from the result.
        // Port-mask and integer table fields (membership masks, VID slots,
        // VLAN_INFO) keep zeroed registers; their declared default is only
        // the `is_default` reference, so an add-only mutation or a write
        // of the declared default still produces a command.
        for field in &self.fields {
            match field.kind() {
                FieldKind::Bit { .. } | FieldKind::Byte { .. } => {
                    field.write(&mut self.registers, field.default(), false)?;
                }
                FieldKind::Bits { .. } | FieldKind::Wide { .. } | FieldKind::PortMask { .. } => {}
            }
        }
        for reg in &mut self.registers {
            reg.freeze_default();
        }
        Ok(SwitchChip {
            variant: self.variant,
            registers: self.registers,
            reg_index: self.reg_index,
            fields: self.fields,
            field_index: self.field_index,
            ports: self.ports,
            features: self.features,
        })
    }
}
