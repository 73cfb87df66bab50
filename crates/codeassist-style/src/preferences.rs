//! The style preference record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

/// Indentation character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indentation {
    #[default]
    Spaces,
    Tabs,
}

impl Indentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indentation::Spaces => "spaces",
            Indentation::Tabs => "tabs",
        }
    }
}

/// Identifier naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    #[default]
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::CamelCase => "camelCase",
            NamingConvention::PascalCase => "PascalCase",
            NamingConvention::KebabCase => "kebab-case",
        }
    }
}

impl fmt::Display for Indentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indentation {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spaces" => Ok(Indentation::Spaces),
            "tabs" => Ok(Indentation::Tabs),
            other => Err(PreferenceError::Invalid {
                field: "indentation",
                message: format!("expected `spaces` or `tabs`, got `{}`", other),
            }),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake_case" => Ok(NamingConvention::SnakeCase),
            "camelCase" => Ok(NamingConvention::CamelCase),
            "PascalCase" => Ok(NamingConvention::PascalCase),
            "kebab-case" => Ok(NamingConvention::KebabCase),
            other => Err(PreferenceError::Invalid {
                field: "naming_convention",
                message: format!(
                    "expected one of snake_case, camelCase, PascalCase, kebab-case, got `{}`",
                    other
                ),
            }),
        }
    }
}

/// Code style preferences applied to generated and translated code.
///
/// Every field has a default, so a partial record on disk still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePreferences {
    /// Spaces or tabs
    pub indentation: Indentation,
    /// Width of one indentation level
    pub indent_size: u32,
    /// Maximum line length
    pub max_line_length: u32,
    /// Identifier naming convention
    pub naming_convention: NamingConvention,
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            indentation: Indentation::Spaces,
            indent_size: 4,
            max_line_length: 80,
            naming_convention: NamingConvention::SnakeCase,
        }
    }
}

impl StylePreferences {
    /// Check the numeric fields are positive.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        if self.indent_size == 0 {
            return Err(PreferenceError::Invalid {
                field: "indent_size",
                message: "must be positive".to_string(),
            });
        }
        if self.max_line_length == 0 {
            return Err(PreferenceError::Invalid {
                field: "max_line_length",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON record.
    pub fn from_json(text: &str) -> Result<Self, PreferenceError> {
        let prefs: StylePreferences = serde_json::from_str(text)?;
        prefs.validate()?;
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = StylePreferences::default();
        assert_eq!(prefs.indentation, Indentation::Spaces);
        assert_eq!(prefs.indent_size, 4);
        assert_eq!(prefs.max_line_length, 80);
        assert_eq!(prefs.naming_convention, NamingConvention::SnakeCase);
    }

    #[test]
    fn test_wire_names() {
        let prefs = StylePreferences {
            indentation: Indentation::Tabs,
            indent_size: 2,
            max_line_length: 120,
            naming_convention: NamingConvention::KebabCase,
        };
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["indentation"], "tabs");
        assert_eq!(json["naming_convention"], "kebab-case");
        assert_eq!(json["indent_size"], 2);
        assert_eq!(json["max_line_length"], 120);
    }

    #[test]
    fn test_partial_record_uses_field_defaults() {
        let prefs = StylePreferences::from_json(r#"{"naming_convention": "camelCase"}"#).unwrap();
        assert_eq!(prefs.naming_convention, NamingConvention::CamelCase);
        assert_eq!(prefs.indent_size, 4);
        assert_eq!(prefs.indentation, Indentation::Spaces);
    }

    #[test]
    fn test_invalid_records() {
        assert!(StylePreferences::from_json(r#"{"indent_size": 0}"#).is_err());
        assert!(StylePreferences::from_json(r#"{"max_line_length": 0}"#).is_err());
        assert!(StylePreferences::from_json(r#"{"indentation": "both"}"#).is_err());
        assert!(StylePreferences::from_json(r#"{"naming_convention": "UPPER"}"#).is_err());
        assert!(StylePreferences::from_json("{not json").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tabs".parse::<Indentation>().unwrap(), Indentation::Tabs);
        assert_eq!(
            "PascalCase".parse::<NamingConvention>().unwrap(),
            NamingConvention::PascalCase
        );
        assert!("pascal".parse::<NamingConvention>().is_err());
    }
}
