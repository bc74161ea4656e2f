//! Wizard step machine — tracks which of the five steps the user is on.

use serde::{Deserialize, Serialize};

/// Number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 5;

/// The five wizard steps, in order.
///
/// Progresses linearly: Profile → Goals → Accounts → Payments → Preferences.
/// Serialized as the 1-based step index, which is also the stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    Profile,
    Goals,
    Accounts,
    Payments,
    Preferences,
}

impl WizardStep {
    /// 1-based index of this step.
    pub fn index(&self) -> u8 {
        match self {
            Self::Profile => 1,
            Self::Goals => 2,
            Self::Accounts => 3,
            Self::Payments => 4,
            Self::Preferences => 5,
        }
    }

    /// Step for a 1-based index, clamped into the valid range.
    pub fn from_index_clamped(index: u8) -> Self {
        match index {
            0 | 1 => Self::Profile,
            2 => Self::Goals,
            3 => Self::Accounts,
            4 => Self::Payments,
            _ => Self::Preferences,
        }
    }

    /// The following step; saturates at the last step.
    pub fn next(&self) -> Self {
        Self::from_index_clamped(self.index().saturating_add(1))
    }

    /// The preceding step; saturates at the first step.
    pub fn prev(&self) -> Self {
        Self::from_index_clamped(self.index().saturating_sub(1))
    }

    /// Whether this is the first step (the back control is hidden here).
    pub fn is_first(&self) -> bool {
        matches!(self, Self::Profile)
    }

    /// Whether this is the last step (its advance action is completion).
    pub fn is_last(&self) -> bool {
        matches!(self, Self::Preferences)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Profile
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Profile => "profile",
            Self::Goals => "goals",
            Self::Accounts => "accounts",
            Self::Payments => "payments",
            Self::Preferences => "preferences",
        };
        write!(f, "{s}")
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.index()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    /// Strict conversion for deserialization — an out-of-range stored step
    /// means the blob is malformed, not a navigation request.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=5 => Ok(Self::from_index_clamped(value)),
            _ => Err(format!("step index out of range: {value}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [WizardStep; 5] = [
        WizardStep::Profile,
        WizardStep::Goals,
        WizardStep::Accounts,
        WizardStep::Payments,
        WizardStep::Preferences,
    ];

    #[test]
    fn next_walks_all_steps() {
        let mut current = WizardStep::Profile;
        for expected in &ALL[1..] {
            current = current.next();
            assert_eq!(current, *expected);
        }
        // Saturates at the end
        assert_eq!(current.next(), WizardStep::Preferences);
    }

    #[test]
    fn prev_walks_back_and_saturates() {
        let mut current = WizardStep::Preferences;
        for expected in ALL[..4].iter().rev() {
            current = current.prev();
            assert_eq!(current, *expected);
        }
        assert_eq!(current.prev(), WizardStep::Profile);
    }

    #[test]
    fn clamped_jump() {
        assert_eq!(WizardStep::from_index_clamped(0), WizardStep::Profile);
        assert_eq!(WizardStep::from_index_clamped(3), WizardStep::Accounts);
        assert_eq!(WizardStep::from_index_clamped(99), WizardStep::Preferences);
    }

    #[test]
    fn serializes_as_index() {
        for step in ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, step.index().to_string());
            let back: WizardStep = serde_json::from_str(&json).unwrap();
            assert_eq!(back, step);
        }
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<WizardStep>("0").is_err());
        assert!(serde_json::from_str::<WizardStep>("6").is_err());
    }

    #[test]
    fn first_and_last() {
        assert!(WizardStep::Profile.is_first());
        assert!(!WizardStep::Profile.is_last());
        assert!(WizardStep::Preferences.is_last());
        assert!(!WizardStep::Preferences.is_first());
    }
}
