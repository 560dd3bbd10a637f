//! CLI command implementations
//!
//! Each module is a thin adapter: it validates the user's intent against
//! the selected chip variant, then mutates profile fields by name. Command
//! generation and transport stay in `main`. Validation happens before the
//! first mutation, so a rejected configuration never leaves the profile in
//! a half-mutated state that could be serialized.

pub mod erase;
pub mod fields;
pub mod mirror;
pub mod vlan;
