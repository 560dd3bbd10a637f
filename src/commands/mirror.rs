//! Port mirroring adapter
//!
//! Maps the `mirror` subcommand onto the MIRROR_RX_SRC / MIRROR_TX_SRC
//! source masks and the MIRROR_DEST destination mask.

use miictl_core::{Error, Features, SwitchChip};

use crate::cli::{MirrorArgs, MirrorDirection};

/// Apply a port mirroring configuration to the chip profile
pub fn run(chip: &mut SwitchChip, args: &MirrorArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !chip.has_feature(Features::PORT_MIRROR) {
        return Err(Error::FeatureUnsupported("port mirroring").into());
    }
    for port in &args.source {
        chip.port(port)?;
    }
    chip.port(&args.dest)?;
    if args.source.iter().any(|p| p == &args.dest) {
        return Err(format!("destination port {} cannot also be a source", args.dest).into());
    }

    let (rx, tx) = match args.direction {
        MirrorDirection::Rx => (true, false),
        MirrorDirection::Tx => (false, true),
        MirrorDirection::Both => (true, true),
    };
    for port in &args.source {
        if rx {
            chip.add_port("MIRROR_RX_SRC", port)?;
        }
        if tx {
            chip.add_port("MIRROR_TX_SRC", port)?;
        }
    }
    chip.add_port("MIRROR_DEST", &args.dest)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use miictl_core::Variant;

    fn args(source: &[&str], dest: &str, direction: MirrorDirection) -> MirrorArgs {
        MirrorArgs {
            source: source.iter().map(|p| p.to_string()).collect(),
            dest: dest.to_owned(),
            direction,
        }
    }

    #[test]
    fn both_directions_fill_both_source_masks() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        run(&mut chip, &args(&["1", "2"], "5", MirrorDirection::Both)).unwrap();

        for port in ["1", "2"] {
            assert!(chip.contains_port("MIRROR_RX_SRC", port).unwrap());
            assert!(chip.contains_port("MIRROR_TX_SRC", port).unwrap());
        }
        assert!(chip.contains_port("MIRROR_DEST", "5").unwrap());
    }

    #[test]
    fn rx_only_leaves_tx_mask_alone() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        run(&mut chip, &args(&["3"], "1", MirrorDirection::Rx)).unwrap();

        assert!(chip.contains_port("MIRROR_RX_SRC", "3").unwrap());
        assert!(!chip.field_is_touched("MIRROR_TX_SRC").unwrap());
    }

    #[test]
    fn destination_cannot_be_a_source() {
        let mut chip = SwitchChip::new(Variant::Switchblox).unwrap();
        assert!(run(&mut chip, &args(&["1", "2"], "2", MirrorDirection::Both)).is_err());
        assert!(chip.commands(true, false).is_empty());
    }
}
