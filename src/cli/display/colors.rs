//! Color theme for CLI output

use crate::shared::Outcome;
use comfy_table::Color as TableColor;

#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color based on provisioning outcome
    pub fn get_outcome_color(&self, outcome: Outcome) -> TableColor {
        match outcome {
            Outcome::Success => self.success,
            Outcome::Yield => self.warning,
        }
    }

    /// Get color based on version validity
    pub fn get_validity_color(&self, valid: bool) -> TableColor {
        if valid {
            self.success
        } else {
            self.error
        }
    }
}
