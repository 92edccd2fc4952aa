use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::{
    Locale,
    LocaleContext,
    is_valid_locale_code,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "availableLocales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationSettings {
    /// Fallback locale when a record type does not define its own.
    pub default_locale: String,

    /// Every locale the application recognizes. Order is kept for bulk reads.
    pub available_locales: Vec<String>,

    /// Locale of the unit of work. If unset, the default locale is active.
    pub active_locale: Option<String>,
}

impl TranslationSettings {
    /// # Errors
    /// - Empty or malformed locale code
    /// - Empty or duplicated available locales
    /// - Default or active locale not available
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.available_locales.is_empty() {
            errors.push(ValidationError::new(
                "availableLocales",
                "At least one locale is required. Example: [\"en\", \"ja\"]",
            ));
        }

        for (index, code) in self.available_locales.iter().enumerate() {
            if !is_valid_locale_code(code) {
                errors.push(ValidationError::new(
                    format!("availableLocales[{index}]"),
                    format!("Invalid locale code '{code}'. Example: \"en\" or \"pt-BR\""),
                ));
            } else if self.available_locales.iter().take(index).any(|seen| seen == code) {
                errors.push(ValidationError::new(
                    format!("availableLocales[{index}]"),
                    format!("Locale '{code}' is listed more than once"),
                ));
            }
        }

        self.check_member("defaultLocale", Some(&self.default_locale), &mut errors);
        self.check_member("activeLocale", self.active_locale.as_ref(), &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Builds the locale context described by these settings.
    #[must_use]
    pub fn locale_context(&self) -> LocaleContext {
        let default = Locale::from(self.default_locale.as_str());
        let active = self.active_locale.as_deref().map_or_else(|| default.clone(), Locale::from);
        LocaleContext::new(
            active,
            self.available_locales.iter().map(|code| Locale::from(code.as_str())),
            default,
        )
    }

    fn check_member(&self, field: &str, code: Option<&String>, errors: &mut Vec<ValidationError>) {
        let Some(code) = code else {
            return;
        };

        if code.is_empty() {
            errors.push(ValidationError::new(
                field,
                "The locale cannot be empty. Please specify a locale, for example: \"en\"",
            ));
        } else if !is_valid_locale_code(code) {
            errors.push(ValidationError::new(field, format!("Invalid locale code '{code}'")));
        } else if !self.available_locales.contains(code) {
            errors.push(ValidationError::new(
                field,
                format!("Locale '{code}' must also be listed in availableLocales"),
            ));
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            available_locales: vec!["en".to_string()],
            active_locale: None,
        }
    }
}
