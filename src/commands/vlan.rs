//! VLAN configuration adapter
//!
//! Maps the `vlan` subcommand onto profile fields: VID slots and
//! membership masks for the VLAN table, UNVID_MODE / VLAN_INGRESS_FILTER
//! for the enforcement mode, VLAN_CLS for forced classification,
//! VLAN_INFO_* for per-port default VIDs and TAG_VLAN_EN / ADD_TAG /
//! REMOVE_TAG for tagging behavior.

use miictl_core::chip::{vid_field_name, vlan_member_field_name, VLAN_SLOTS};
use miictl_core::{Error, Features, SwitchChip};

use crate::cli::{VlanArgs, VlanMode};

/// Apply a VLAN configuration to the chip profile
pub fn run(chip: &mut SwitchChip, args: &VlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(chip, args)?;

    for (slot, spec) in args.vlans.iter().enumerate() {
        chip.set_value(&vid_field_name(slot), u64::from(spec.vid))?;
        let member = vlan_member_field_name(slot);
        chip.clear_ports(&member)?;
        for port in &spec.ports {
            chip.add_port(&member, port)?;
        }
    }

    let all_ports: Vec<String> = chip.ports().iter().map(|p| p.label().to_owned()).collect();

    match args.mode {
        None => {}
        Some(VlanMode::Disable) => {
            log::warn!("VLAN mode 'disable' leaves the VLAN registers at chip defaults");
        }
        Some(VlanMode::Optional) => {
            chip.set_flag("UNVID_MODE", true)?;
        }
        Some(VlanMode::Enable) => {
            chip.set_flag("UNVID_MODE", false)?;
            chip.clear_ports("VLAN_INGRESS_FILTER")?;
        }
        Some(VlanMode::Strict) => {
            chip.set_flag("UNVID_MODE", false)?;
            chip.clear_ports("VLAN_INGRESS_FILTER")?;
            for port in &all_ports {
                chip.add_port("VLAN_INGRESS_FILTER", port)?;
            }
        }
    }

    if args.force {
        for port in &all_ports {
            chip.add_port("VLAN_CLS", port)?;
        }
    }

    for spec in &args.pvids {
        let index = chip
            .ports()
            .iter()
            .position(|p| p.label() == spec.port)
            .ok_or_else(|| Error::UnknownPort(spec.port.clone()))?;
        chip.set_value(&format!("VLAN_INFO_{}", index), u64::from(spec.vid))?;
    }

    for port in &args.tagged {
        chip.add_port("TAG_VLAN_EN", port)?;
    }
    for port in &args.header_add {
        chip.add_port("ADD_TAG", port)?;
    }
    for port in &args.header_strip {
        chip.add_port("REMOVE_TAG", port)?;
    }

    if let Some(frame_type) = args.frame_type {
        chip.set_value("ACCEPTABLE_FRM_TYPE", u64::from(frame_type))?;
    }

    Ok(())
}

/// Reject a configuration before any field is mutated
fn validate(chip: &SwitchChip, args: &VlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.vlans.len() > VLAN_SLOTS {
        return Err(format!(
            "at most {} VLANs can be configured, got {}",
            VLAN_SLOTS,
            args.vlans.len()
        )
        .into());
    }
    if !args.vlans.is_empty() && !chip.has_feature(Features::VLAN_TABLE) {
        return Err(Error::FeatureUnsupported("a VLAN table").into());
    }
    if !args.tagged.is_empty() && !chip.has_feature(Features::TAGGED_VLAN) {
        return Err(Error::FeatureUnsupported("tagged VLANs").into());
    }
    if args.force && !chip.has_feature(Features::VLAN_FORCE) {
        return Err(Error::FeatureUnsupported("forced VLAN classification").into());
    }
    if (!args.header_add.is_empty() || !args.header_strip.is_empty())
        && !chip.has_feature(Features::PER_PORT_VLAN_HEADER_ACTION)
    {
        return Err(Error::FeatureUnsupported("per-port VLAN header actions").into());
    }
    if let Some(mode) = args.mode {
        let needed = match mode {
            VlanMode::Disable => None,
            VlanMode::Optional => Some(Features::VLAN_MODE_OPTIONAL),
            VlanMode::Enable => Some(Features::VLAN_MODE_ENABLE),
            VlanMode::Strict => Some(Features::VLAN_MODE_STRICT),
        };
        if let Some(needed) = needed {
            if !chip.has_feature(needed) {
                return Err(Error::FeatureUnsupported("the requested VLAN mode").into());
            }
        }
    }

    for spec in &args.vlans {
        if spec.vid == 0 || spec.vid > 4095 {
            return Err(format!("VLAN ID {} is outside 1..=4095", spec.vid).into());
        }
        for port in &spec.ports {
            chip.port(port)?;
        }
    }
    for spec in &args.pvids {
        if spec.vid == 0 || spec.vid > 4095 {
            return Err(format!("VLAN ID {} is outside 1..=4095", spec.vid).into());
        }
        chip.port(&spec.port)?;
    }
    for port in args
        .tagged
        .iter()
        .chain(&args.header_add)
        .chain(&args.header_strip)
    {
        chip.port(port)?;
    }
    if let Some(frame_type) = args.frame_type {
        if frame_type > 3 {
            return Err(format!("frame type {} is outside 0..=3", frame_type).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PvidSpec, VlanSpec};
    use miictl_core::Variant;

    fn spec(vid: u16, ports: &[&str]) -> VlanSpec {
        VlanSpec {
            vid,
            ports: ports.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn rejects_unknown_port_before_mutating() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let args = VlanArgs {
            vlans: vec![spec(10, &["1", "9"])],
            ..Default::default()
        };

        assert!(run(&mut chip, &args).is_err());
        // Nothing was mutated, so nothing serializes
        assert!(chip.commands(true, false).is_empty());
    }

    #[test]
    fn rejects_out_of_range_vid() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let args = VlanArgs {
            vlans: vec![spec(0, &["1"])],
            ..Default::default()
        };
        assert!(run(&mut chip, &args).is_err());
        assert!(chip.commands(true, false).is_empty());
    }

    #[test]
    fn table_entries_fill_slots_in_order() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let args = VlanArgs {
            vlans: vec![spec(100, &["1", "2"]), spec(200, &["3"])],
            ..Default::default()
        };
        run(&mut chip, &args).unwrap();

        assert_eq!(chip.value("VID_0").unwrap(), 100);
        assert_eq!(chip.value("VID_1").unwrap(), 200);
        assert!(chip.contains_port("VLAN_MEMBER_0", "1").unwrap());
        assert!(chip.contains_port("VLAN_MEMBER_0", "2").unwrap());
        assert!(!chip.contains_port("VLAN_MEMBER_0", "3").unwrap());
        assert!(chip.contains_port("VLAN_MEMBER_1", "3").unwrap());

        // Two touched slots -> validity bitmap 0b11
        let _ = chip.commands(true, false);
        assert_eq!(chip.value("VLAN_VALID").unwrap(), 0b11);
    }

    #[test]
    fn strict_mode_fills_the_ingress_filter() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let args = VlanArgs {
            mode: Some(VlanMode::Strict),
            ..Default::default()
        };
        run(&mut chip, &args).unwrap();

        assert!(!chip.flag("UNVID_MODE").unwrap());
        for port in ["1", "2", "3", "4", "5"] {
            assert!(chip.contains_port("VLAN_INGRESS_FILTER", port).unwrap());
        }
        assert!(chip.field_is_touched("VLAN_INGRESS_FILTER").unwrap());
    }

    #[test]
    fn pvid_targets_the_ports_info_register() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        let args = VlanArgs {
            pvids: vec![PvidSpec {
                port: "2".into(),
                vid: 42,
            }],
            ..Default::default()
        };
        run(&mut chip, &args).unwrap();
        assert_eq!(chip.value("VLAN_INFO_1").unwrap(), 42);
        assert_eq!(chip.value("VLAN_INFO_0").unwrap(), 0);
    }

    #[test]
    fn nano_rejects_ports_it_does_not_have() {
        let mut chip = SwitchChip::new(Variant::SwitchbloxNano).unwrap();
        let args = VlanArgs {
            tagged: vec!["4".into()],
            ..Default::default()
        };
        assert!(run(&mut chip, &args).is_err());
        assert!(chip.commands(true, false).is_empty());
    }

    #[test]
    fn force_adds_every_port_to_vlan_cls() {
        let mut chip = SwitchChip::new(Variant::SwitchbloxNano).unwrap();
        let args = VlanArgs {
            force: true,
            ..Default::default()
        };
        run(&mut chip, &args).unwrap();
        for port in ["1", "2", "3"] {
            assert!(chip.contains_port("VLAN_CLS", port).unwrap());
        }
    }
}
