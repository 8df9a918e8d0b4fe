//! Status icons for CLI output

use crate::shared::Outcome;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (converged / valid)
    pub const SUCCESS: &'static str = "✓";

    /// Warning icon (not ready yet)
    pub const WARNING: &'static str = "⚠";

    /// Error icon (failed / invalid)
    pub const ERROR: &'static str = "✗";

    /// Pending icon (waiting)
    pub const PENDING: &'static str = "⏳";

    /// Get status icon for a provisioning outcome
    pub fn for_outcome(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Yield => Self::PENDING,
        }
    }

    /// Get status icon for a validation result
    pub fn for_validity(valid: bool) -> &'static str {
        if valid {
            Self::SUCCESS
        } else {
            Self::ERROR
        }
    }

    /// Get status text for a provisioning outcome
    pub fn get_status_text(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Success => "Converged",
            Outcome::Yield => "Pending",
        }
    }
}
