//! Athlete profile document.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sports with built-in metric defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sport {
    Baseball,
    Basketball,
    Football,
    Lacrosse,
    TrackAndField,
    Tennis,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Baseball,
        Sport::Basketball,
        Sport::Football,
        Sport::Lacrosse,
        Sport::TrackAndField,
        Sport::Tennis,
    ];

    /// Parse the stored kebab-case value (`"track-and-field"`).
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown sport '{s}'")))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseball => "baseball",
            Self::Basketball => "basketball",
            Self::Football => "football",
            Self::Lacrosse => "lacrosse",
            Self::TrackAndField => "track-and-field",
            Self::Tennis => "tennis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseball => "Baseball",
            Self::Basketball => "Basketball",
            Self::Football => "Football",
            Self::Lacrosse => "Lacrosse",
            Self::TrackAndField => "Track & Field",
            Self::Tennis => "Tennis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
    Nonbinary,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Nonbinary => "Nonbinary",
        }
    }
}

/// A user's profile. `weight` (kg) is the scaling input for weight-relative
/// badge targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub sport: Sport,
    pub weight: f64,
    pub age: u32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub daily_setup_complete: bool,
    #[serde(default)]
    pub outcomes_setup_complete: bool,
}

impl Profile {
    /// Reject values no form should ever submit.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.username.trim().is_empty() {
            return Err(CoreError::Validation("username must not be empty".to_string()));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(CoreError::Validation(format!(
                "weight must be a non-negative number, got {}",
                self.weight
            )));
        }
        Ok(())
    }

    /// Body weight as a badge scaling factor; absent when not recorded.
    pub fn scaling_factor(&self) -> Option<f64> {
        (self.weight > 0.0).then_some(self.weight)
    }
}
