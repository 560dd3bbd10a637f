//! Error types for miictl-core

use thiserror::Error;

use crate::register::RegisterAddress;

/// Core error type
///
/// Every variant here is a precondition violation against the fixed chip
/// schema: a caller addressed a field or port that does not exist, passed a
/// value that does not fit the declared bit width, or a variant table was
/// declared inconsistently. None of these are retried or recovered from;
/// the current operation is aborted before any partial mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Field name not declared by this chip variant
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Port label not declared by this chip variant
    #[error("unknown port: {0}")]
    UnknownPort(String),

    /// Value does not fit in the field's declared bit width
    #[error("value {value} does not fit field {field} (max {max})")]
    ValueOutOfRange {
        /// Field that was being written
        field: String,
        /// The rejected value
        value: u64,
        /// Largest value the field can hold
        max: u64,
    },

    /// A typed accessor was used on a field of a different kind
    #[error("field {field} is not a {expected} field")]
    WrongKind {
        /// Field that was addressed
        field: String,
        /// Kind the accessor expected
        expected: &'static str,
    },

    /// Two registers with the same address were declared
    #[error("duplicate register address {0}")]
    DuplicateRegister(RegisterAddress),

    /// Two fields with the same name were declared
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field was bound to a register that was never declared
    #[error("field {field} is bound to missing register {addr}")]
    MissingRegister {
        /// Field being declared
        field: String,
        /// The address that is not in the register map
        addr: RegisterAddress,
    },

    /// A field was declared without any backing register
    #[error("field {0} is bound to no registers")]
    EmptyField(String),

    /// A field's bit geometry does not fit its backing register(s)
    #[error("field {0} geometry exceeds register width")]
    InvalidGeometry(String),

    /// The selected chip variant does not support the requested feature
    #[error("chip variant does not support {0}")]
    FeatureUnsupported(&'static str),
}

/// Result type alias using the core error type
pub type Result<T> = core::result::Result<T, Error>;
