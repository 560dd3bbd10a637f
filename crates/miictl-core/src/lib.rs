//! miictl-core - Register and bit-field model for switch configuration
//!
//! This crate models the configuration registers of the IP175G switch ASIC
//! used on Switchblox boards, and turns mutated register state into the
//! firmware command stream written over the board's UART.
//!
//! The model has three layers:
//!
//! - [`register::Register`] - one addressable, fixed-width unit of chip
//!   memory, with its default bytes and a "touched" flag
//! - [`field::Field`] - a named, typed view over bits of one or more
//!   registers (single bits, bit ranges, bytes, multi-register integers,
//!   per-port masks)
//! - [`chip::SwitchChip`] - the per-variant assembly of ports, feature
//!   flags, registers and fields; owns command generation
//!
//! # Example
//!
//! ```
//! use miictl_core::{SwitchChip, Variant};
//!
//! let mut chip = SwitchChip::new(Variant::Switchblox)?;
//! chip.set_value("VID_0", 100)?;
//! chip.add_port("VLAN_MEMBER_0", "1")?;
//! let commands = chip.commands(true, false);
//! assert!(!commands.is_empty());
//! # Ok::<(), miictl_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod chip;
pub mod command;
pub mod error;
pub mod field;
pub mod port;
pub mod register;

pub use chip::{Features, SwitchChip, Variant};
pub use command::Command;
pub use error::{Error, Result};
pub use field::{Field, FieldKind, RegisterOrder};
pub use port::Port;
pub use register::{Register, RegisterAddress};
