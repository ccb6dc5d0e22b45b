//! Session model holding the current, ephemeral working state.

use serde::{Deserialize, Serialize};

/// Colour theme of the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Convert theme to its stored string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Interpret a raw stored value. Only the exact literal `"dark"` is dark.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of the last validation of the current code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Not validated since the code last changed.
    #[default]
    Idle,
    /// Validator accepted the code.
    Valid,
    /// Validator rejected the code, or validation failed.
    Invalid,
}

impl ValidationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostics returned by the validation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub errors: Option<String>,
    #[serde(default)]
    pub warnings: Option<String>,
}

impl ValidationReport {
    pub const fn valid() -> Self {
        Self {
            valid: true,
            errors: None,
            warnings: None,
        }
    }

    pub fn invalid(errors: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: Some(errors.into()),
            warnings: None,
        }
    }
}

/// Requests currently awaiting a collaborator response.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activity {
    pub generating: usize,
    pub validating: usize,
    pub simulating: usize,
}

#[allow(dead_code)]
impl Activity {
    pub const fn is_generating(&self) -> bool {
        self.generating > 0
    }

    pub const fn is_validating(&self) -> bool {
        self.validating > 0
    }

    pub const fn is_simulating(&self) -> bool {
        self.simulating > 0
    }

    pub const fn is_idle(&self) -> bool {
        self.generating == 0 && self.validating == 0 && self.simulating == 0
    }
}

/// Current working state of the active front-end instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Prompt text as typed.
    pub prompt: String,
    /// Code currently shown in the preview.
    pub generated_code: String,
    pub validation_status: ValidationStatus,
    /// Diagnostics from the last completed validation.
    pub validation_report: Option<ValidationReport>,
    /// Why the last generation failed; cleared by the next request.
    pub generation_error: Option<String>,
    pub theme: Theme,
    pub activity: Activity,
}

impl Session {
    /// Create a fresh session with the given persisted theme.
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_stored_is_exact() {
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        for raw in ["Dark", "DARK", "", " dark", "light", "true"] {
            assert_eq!(Theme::from_stored(Some(raw)), Theme::Light, "{raw:?}");
        }
        assert_eq!(Theme::from_stored(None), Theme::Light);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_fresh_session_defaults() {
        let session = Session::with_theme(Theme::Dark);
        assert_eq!(session.theme, Theme::Dark);
        assert!(session.prompt.is_empty());
        assert_eq!(session.validation_status, ValidationStatus::Idle);
        assert!(session.activity.is_idle());
    }
}
