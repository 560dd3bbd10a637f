//! Switch chip feature flags

use bitflags::bitflags;

bitflags! {
    /// Capability flags declared by a chip variant
    ///
    /// Configuration adapters check these before mutating any field, so an
    /// unsupported intent is rejected without leaving a half-configured
    /// profile behind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        /// 802.1Q tagged VLANs
        const TAGGED_VLAN                  = 1 << 0;
        /// VLAN table with VID slots and per-slot membership
        const VLAN_TABLE                   = 1 << 1;
        /// Global VLAN mode "optional"
        const VLAN_MODE_OPTIONAL           = 1 << 2;
        /// Global VLAN mode "enable"
        const VLAN_MODE_ENABLE             = 1 << 3;
        /// Global VLAN mode "strict" (ingress filtering)
        const VLAN_MODE_STRICT             = 1 << 4;
        /// Force the default VLAN ID on ingress
        const VLAN_FORCE                   = 1 << 5;

        /// Per-port VLAN mode control
        const PER_PORT_VLAN_MODE           = 1 << 6;
        /// Per-port VLAN mode "disable"
        const PER_PORT_VLAN_MODE_DISABLE   = 1 << 7;
        /// Per-port VLAN mode "optional"
        const PER_PORT_VLAN_MODE_OPTIONAL  = 1 << 8;
        /// Per-port VLAN mode "enable"
        const PER_PORT_VLAN_MODE_ENABLE    = 1 << 9;
        /// Per-port VLAN mode "strict"
        const PER_PORT_VLAN_MODE_STRICT    = 1 << 10;
        /// Per-port force of the default VLAN ID
        const PER_PORT_VLAN_FORCE          = 1 << 11;
        /// Per-port VLAN header action (add/strip tag)
        const PER_PORT_VLAN_HEADER_ACTION  = 1 << 12;

        /// Port mirroring
        const PORT_MIRROR                  = 1 << 13;
    }
}
