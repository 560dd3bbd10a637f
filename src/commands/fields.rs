//! Field listing command

use miictl_core::{FieldKind, SwitchChip};

/// Print every field of the selected variant with its current state
pub fn list_fields(chip: &SwitchChip) {
    println!("Fields of {}:", chip.variant().name());
    println!();
    println!(
        "{:<22} {:<10} {:<14} {:>8} {:^8}",
        "Field", "Kind", "Value", "Default", "Touched"
    );
    println!("{}", "-".repeat(68));

    for name in chip.field_names() {
        let field = chip.field(name).expect("listed field exists");
        let value = match field.kind() {
            FieldKind::Bit { .. } => chip.flag(name).expect("bit field").to_string(),
            FieldKind::PortMask { .. } => {
                let ports = chip.ports_in(name).expect("port mask field");
                if ports.is_empty() {
                    "-".to_string()
                } else {
                    ports
                        .iter()
                        .map(|p| p.label())
                        .collect::<Vec<_>>()
                        .join(",")
                }
            }
            _ => chip.raw_value(name).expect("integer field").to_string(),
        };
        let touched = if chip.field_is_touched(name).unwrap_or(false) {
            "yes"
        } else {
            ""
        };
        println!(
            "{:<22} {:<10} {:<14} {:>8} {:^8}",
            name,
            field.kind().name(),
            value,
            field.default(),
            touched
        );
    }
}
