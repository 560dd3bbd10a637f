//! IP175G register and field tables
//!
//! The Microchip IP175G is the switch ASIC on both Switchblox boards. The
//! Nano variant exposes three of the five switch ports and omits the two
//! per-port default-VID registers that only exist for ports 4 and 5.
//!
//! Register payloads are 16 bits. PHY 20 holds the mirror control block,
//! PHY 23 the VLAN behavior registers and PHY 24 the VLAN table (validity
//! bitmap, 16 VID slots, 8 membership registers carrying two per-port
//! masks each).

use super::{ChipBuilder, Features, SwitchChip, Variant, VLAN_SLOTS};
use crate::error::Result;
use crate::port::Port;
use crate::register::RegisterAddress;

/// Payload width of every IP175G register, in bytes
pub(super) const REGISTER_WIDTH: usize = 2;

fn addr(phy: u8, mii: u8) -> RegisterAddress {
    RegisterAddress::new(phy, mii)
}

pub(super) fn build(variant: Variant) -> Result<SwitchChip> {
    let nano = variant == Variant::SwitchbloxNano;

    let mut ports = vec![Port::new("1", 2), Port::new("2", 3), Port::new("3", 4)];
    if !nano {
        ports.push(Port::new("4", 6));
        ports.push(Port::new("5", 7));
    }

    let features = Features::TAGGED_VLAN
        | Features::VLAN_TABLE
        | Features::VLAN_MODE_OPTIONAL
        | Features::VLAN_MODE_ENABLE
        | Features::VLAN_MODE_STRICT
        | Features::VLAN_FORCE
        | Features::PER_PORT_VLAN_MODE
        | Features::PER_PORT_VLAN_MODE_DISABLE
        | Features::PER_PORT_VLAN_MODE_OPTIONAL
        | Features::PER_PORT_VLAN_MODE_ENABLE
        | Features::PER_PORT_VLAN_MODE_STRICT
        | Features::PER_PORT_VLAN_FORCE
        | Features::PER_PORT_VLAN_HEADER_ACTION
        | Features::PORT_MIRROR;

    let mut b = ChipBuilder::new(variant, REGISTER_WIDTH, features, ports);

    // Mirror control block
    b.add_register(addr(20, 3))?;
    b.add_register(addr(20, 4))?;

    // VLAN behavior registers
    b.add_register(addr(23, 0))?;
    b.add_register(addr(23, 1))?;
    b.add_register(addr(23, 2))?;
    b.add_register(addr(23, 7))?;
    b.add_register(addr(23, 8))?;
    b.add_register(addr(23, 9))?;
    if !nano {
        b.add_register(addr(23, 11))?;
        b.add_register(addr(23, 12))?;
    }
    b.add_register(addr(23, 13))?;
    b.add_register(addr(23, 14))?;
    b.add_register(addr(23, 19))?;

    // VLAN table
    for i in 0..25 {
        b.add_register(addr(24, i))?;
    }

    b.add_port_mask("MIRROR_RX_SRC", addr(20, 3), 0, false)?;
    b.add_port_mask("MIRROR_DEST", addr(20, 3), 1, false)?;
    b.add_port_mask("MIRROR_TX_SRC", addr(20, 4), 0, false)?;

    b.add_bit("UNVID_MODE", addr(23, 0), 13, false)?;
    b.add_bit("VLAN_TABLE_CLR", addr(23, 0), 15, false)?;

    b.add_port_mask("TAG_VLAN_EN", addr(23, 1), 0, false)?;
    b.add_port_mask("VLAN_CLS", addr(23, 1), 1, false)?;

    b.add_bit("VLAN_DROP_CFI", addr(23, 2), 13, false)?;
    b.add_bit("RSVD_VID_2", addr(23, 2), 12, false)?;
    b.add_bit("RSVD_VID_1", addr(23, 2), 11, false)?;
    b.add_bit("RSVD_VID_0", addr(23, 2), 10, true)?;
    b.add_bits("ACCEPTABLE_FRM_TYPE", addr(23, 2), 8, 2, 0)?;
    b.add_port_mask("VLAN_INGRESS_FILTER", addr(23, 2), 0, true)?;

    // Per-port default VLAN ID, one 16-bit register per port
    let info_regs: &[RegisterAddress] = if nano {
        &[addr(23, 7), addr(23, 8), addr(23, 9)]
    } else {
        &[addr(23, 7), addr(23, 8), addr(23, 9), addr(23, 11), addr(23, 12)]
    };
    for (i, reg) in info_regs.iter().enumerate() {
        b.add_bits(&format!("VLAN_INFO_{}", i), *reg, 0, 16, 1)?;
    }

    b.add_port_mask("ADD_TAG", addr(23, 13), 0, false)?;
    b.add_port_mask("REMOVE_TAG", addr(23, 14), 0, false)?;

    b.add_bit("LEAKY_VLAN_2", addr(23, 19), 2, false)?;
    b.add_bit("LEAKY_VLAN_1", addr(23, 19), 1, false)?;
    b.add_bit("LEAKY_VLAN_0", addr(23, 19), 0, false)?;

    b.add_bits("VLAN_VALID", addr(24, 0), 0, 16, 0)?;

    for i in 0..VLAN_SLOTS {
        b.add_bits(
            &super::vid_field_name(i),
            addr(24, i as u8 + 1),
            0,
            12,
            i as u64 + 1,
        )?;
    }

    // Two membership masks per register, low byte first
    for i in 0..VLAN_SLOTS {
        b.add_port_mask(
            &super::vlan_member_field_name(i),
            addr(24, 17 + (i as u8 / 2)),
            i as u8 % 2,
            true,
        )?;
    }

    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn full_variant_has_five_ports() {
        let chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let labels: Vec<&str> = chip.ports().iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(chip.ports()[3].bit(), 6);
        assert_eq!(chip.ports()[4].bit(), 7);
    }

    #[test]
    fn nano_variant_shrinks_ports_and_fields() {
        let chip = SwitchChip::new(Variant::SwitchbloxNano).unwrap();
        assert_eq!(chip.ports().len(), 3);

        // The per-port VID fields for the missing ports do not exist
        assert!(chip.field("VLAN_INFO_2").is_ok());
        assert_eq!(
            chip.field("VLAN_INFO_3").unwrap_err(),
            Error::UnknownField("VLAN_INFO_3".into())
        );
        assert!(chip.field("VLAN_INFO_4").is_err());

        // Port labels beyond the board do not resolve
        assert_eq!(chip.port("4").unwrap_err(), Error::UnknownPort("4".into()));
    }

    #[test]
    fn nano_never_emits_undeclared_registers() {
        let mut chip = SwitchChip::new(Variant::SwitchbloxNano).unwrap();
        let cmds = chip.commands(false, false);
        assert!(!cmds.iter().any(|c| c.phy == 23 && (c.mii == 11 || c.mii == 12)));
        assert_eq!(cmds.len(), chip.registers().len());
    }

    #[test]
    fn both_variants_expose_the_full_vlan_table() {
        for variant in [Variant::Switchblox, Variant::SwitchbloxNano] {
            let chip = SwitchChip::new(variant).unwrap();
            for slot in 0..VLAN_SLOTS {
                assert!(chip.field(&super::super::vid_field_name(slot)).is_ok());
                assert!(chip
                    .field(&super::super::vlan_member_field_name(slot))
                    .is_ok());
            }
        }
    }

    #[test]
    fn only_bit_defaults_are_materialized() {
        let chip = SwitchChip::new(Variant::Switchblox).unwrap();

        assert!(chip.flag("RSVD_VID_0").unwrap());
        assert!(!chip.flag("UNVID_MODE").unwrap());

        // Port masks and VID slots default by reference only; the
        // registers stay zeroed so add-only mutations serialize.
        for port in ["1", "2", "3", "4", "5"] {
            assert!(!chip.contains_port("VLAN_INGRESS_FILTER", port).unwrap());
            assert!(!chip.contains_port("VLAN_MEMBER_0", port).unwrap());
            assert!(!chip.contains_port("TAG_VLAN_EN", port).unwrap());
        }
        assert!(!chip.field_is_default("VLAN_MEMBER_0").unwrap());

        assert_eq!(chip.value("VID_0").unwrap(), 0);
        assert!(!chip.field_is_default("VID_0").unwrap());
    }

    #[test]
    fn vid_slot_defaults_follow_slot_index() {
        let chip = SwitchChip::new(Variant::Switchblox).unwrap();
        assert_eq!(chip.field("VID_0").unwrap().default(), 1);
        assert_eq!(chip.field("VID_F").unwrap().default(), 16);
    }

    #[test]
    fn mirror_block_is_declared_on_both_variants() {
        for variant in [Variant::Switchblox, Variant::SwitchbloxNano] {
            let chip = SwitchChip::new(variant).unwrap();
            assert!(chip.has_feature(Features::PORT_MIRROR));
            assert!(chip.field("MIRROR_RX_SRC").is_ok());
            assert!(chip.field("MIRROR_TX_SRC").is_ok());
            assert!(chip.field("MIRROR_DEST").is_ok());
        }
    }
}
