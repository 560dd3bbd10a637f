//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use miictl_core::Variant;

/// VLAN table entry: a VLAN ID plus its member ports
#[derive(Debug, Clone)]
pub struct VlanSpec {
    /// 802.1Q VLAN ID, 1..=4095
    pub vid: u16,
    /// Member port labels
    pub ports: Vec<String>,
}

/// Parse a `VID:PORT[,PORT...]` VLAN table entry
fn parse_vlan_spec(s: &str) -> Result<VlanSpec, String> {
    let (vid, ports) = s
        .split_once(':')
        .ok_or_else(|| "expected VID:PORT[,PORT...]".to_string())?;
    let vid = vid
        .parse::<u16>()
        .map_err(|e| format!("invalid VLAN ID: {}", e))?;
    let ports: Vec<String> = ports
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect();
    if ports.is_empty() {
        return Err(format!("VLAN {} has no member ports", vid));
    }
    Ok(VlanSpec { vid, ports })
}

/// Per-port default VLAN ID
#[derive(Debug, Clone)]
pub struct PvidSpec {
    /// Port label
    pub port: String,
    /// Default VLAN ID assigned to untagged ingress on that port
    pub vid: u16,
}

/// Parse a `PORT:VID` default-VLAN assignment
fn parse_pvid_spec(s: &str) -> Result<PvidSpec, String> {
    let (port, vid) = s
        .split_once(':')
        .ok_or_else(|| "expected PORT:VID".to_string())?;
    let vid = vid
        .parse::<u16>()
        .map_err(|e| format!("invalid VLAN ID: {}", e))?;
    Ok(PvidSpec {
        port: port.to_owned(),
        vid,
    })
}

#[derive(Parser)]
#[command(name = "miictl")]
#[command(author, version, about = "Switchblox switch configuration tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Board variant
    #[arg(long, value_enum, default_value_t = VariantArg::Switchblox, global = true)]
    pub variant: VariantArg,

    /// Serial device connected to the board (e.g. /dev/ttyUSB0)
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    /// Print the generated commands instead of writing to the device
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Emit every register, not only those differing from chip defaults
    #[arg(long, global = true)]
    pub all_registers: bool,

    /// Emit only registers written during this invocation
    #[arg(long, global = true)]
    pub only_touched: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Board variant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Full 5-port Switchblox
    Switchblox,
    /// 3-port Switchblox Nano
    Nano,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Switchblox => Variant::Switchblox,
            VariantArg::Nano => Variant::SwitchbloxNano,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure 802.1Q VLANs
    Vlan(VlanArgs),

    /// Configure port mirroring
    Mirror(MirrorArgs),

    /// Erase all stored configuration from the board EEPROM
    Erase,

    /// List the variant's fields with their current state
    Fields,
}

/// Global VLAN enforcement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VlanMode {
    /// Leave VLAN handling at chip defaults
    Disable,
    /// Classify by VLAN tag but forward unknown VIDs
    Optional,
    /// Classify by VLAN tag and drop unknown VIDs
    Enable,
    /// Additionally drop frames arriving on a port outside the VID's membership
    Strict,
}

/// VLAN configuration options
#[derive(clap::Args, Debug, Clone, Default)]
pub struct VlanArgs {
    /// VLAN table entry as VID:PORT[,PORT...] (repeatable; fills slots in order)
    #[arg(long = "vlan", value_parser = parse_vlan_spec)]
    pub vlans: Vec<VlanSpec>,

    /// Global VLAN enforcement mode
    #[arg(long, value_enum)]
    pub mode: Option<VlanMode>,

    /// Force the per-port default VLAN ID on all ingress
    #[arg(long)]
    pub force: bool,

    /// Default VLAN ID per port, as PORT:VID (repeatable)
    #[arg(long = "pvid", value_parser = parse_pvid_spec)]
    pub pvids: Vec<PvidSpec>,

    /// Ports with 802.1Q tagging enabled (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tagged: Vec<String>,

    /// Ports that add a tag to untagged frames on egress
    #[arg(long = "header-add", value_delimiter = ',')]
    pub header_add: Vec<String>,

    /// Ports that always strip the tag on egress
    #[arg(long = "header-strip", value_delimiter = ',')]
    pub header_strip: Vec<String>,

    /// Acceptable frame type (0 = any, 1 = tagged only, 2 = untagged only)
    #[arg(long = "frame-type")]
    pub frame_type: Option<u8>,
}

/// Which direction of traffic to mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MirrorDirection {
    /// Received traffic only
    Rx,
    /// Transmitted traffic only
    Tx,
    /// Both directions
    Both,
}

/// Port mirroring options
#[derive(clap::Args, Debug, Clone)]
pub struct MirrorArgs {
    /// Ports whose traffic is mirrored (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub source: Vec<String>,

    /// Port receiving the mirrored traffic
    #[arg(long, required = true)]
    pub dest: String,

    /// Which direction of traffic to mirror
    #[arg(long, value_enum, default_value_t = MirrorDirection::Both)]
    pub direction: MirrorDirection,
}
