//! Physical switch port identity

/// One physical switch port
///
/// Ports are pure identity: a display label (the number printed on the
/// board) and the bit position the port occupies in port-mask fields. The
/// port set is fixed per chip variant at profile construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    label: String,
    bit: u8,
}

impl Port {
    /// Create a new port
    pub fn new(label: impl Into<String>, bit: u8) -> Self {
        Self {
            label: label.into(),
            bit,
        }
    }

    /// The label printed on the board, e.g. `"1"`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bit position of this port in port-mask fields
    pub fn bit(&self) -> u8 {
        self.bit
    }
}
