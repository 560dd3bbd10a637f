//! Bulk-erase command
//!
//! Erasing does not go through the register map: the firmware reserves the
//! fixed command `[101, 0, 0, 0]` for wiping all configuration stored in
//! the board EEPROM.

use miictl_core::Command;

/// The firmware command that erases all stored configuration
pub fn commands() -> Vec<Command> {
    vec![Command::new(101, 0, vec![0, 0])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erase_is_the_fixed_firmware_command() {
        let cmds = commands();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].flatten(), vec![101, 0, 0, 0]);
    }
}
