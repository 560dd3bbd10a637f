//! miictl - Switchblox switch configuration tool
//!
//! Translates configuration intents (VLAN membership, port tagging, VLAN
//! enforcement mode, port mirroring, bulk erase) into the register-write
//! command stream the board firmware consumes over UART.
//!
//! The register and field model lives in `miictl-core`; the serial
//! transport in `miictl-uart`. This binary is glue: parse arguments, build
//! the chip profile for the selected board variant, let the subcommand
//! adapter mutate fields by name, then send (or print) the generated
//! commands.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use miictl_core::{SwitchChip, Variant};
use miictl_uart::UartWriter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let variant: Variant = cli.variant.into();
    let mut chip = SwitchChip::new(variant)?;
    log::info!(
        "Configuring {} ({} ports)",
        chip.variant().name(),
        chip.ports().len()
    );

    let commands = match &cli.command {
        Commands::Fields => {
            commands::fields::list_fields(&chip);
            return Ok(());
        }
        Commands::Erase => commands::erase::commands(),
        Commands::Vlan(args) => {
            commands::vlan::run(&mut chip, args)?;
            chip.commands(!cli.all_registers, cli.only_touched)
        }
        Commands::Mirror(args) => {
            commands::mirror::run(&mut chip, args)?;
            chip.commands(!cli.all_registers, cli.only_touched)
        }
    };

    if commands.is_empty() {
        log::warn!("Configuration matches chip defaults; nothing to send");
        return Ok(());
    }

    if cli.dry_run {
        for cmd in &commands {
            println!("{}", cmd);
        }
        return Ok(());
    }

    let device = cli
        .device
        .as_deref()
        .ok_or("no serial device specified (use --device or --dry-run)")?;
    let mut writer = UartWriter::open(device, None)?;
    writer.send(&commands)?;
    log::info!("Configuration written to {}", device);

    Ok(())
}
