//! Error types for translation persistence.

use thiserror::Error;

use crate::record::RecordId;

/// A translation record failed validation in the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Translation validation failed on '{field}': {message}")]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    #[must_use]
    pub fn missing_locale() -> Self {
        Self::new("locale", "can't be blank")
    }

    #[must_use]
    pub fn duplicate_locale(locale: &str) -> Self {
        Self::new("locale", format!("'{locale}' has already been taken for this owner"))
    }

    #[must_use]
    pub fn duplicate_id(id: RecordId) -> Self {
        Self::new("id", format!("{id} is used by more than one record"))
    }
}

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation record is invalid:\n{}", format_failures(.0))]
    Validation(Vec<ValidationFailure>),

    /// The owning entity has no identity yet, so nothing can be attached to it.
    #[error("Owning entity has not been persisted")]
    NotPersisted,

    #[error("Translation record {0} does not exist")]
    UnknownRecord(RecordId),

    /// The store cannot hand out another record id or creation stamp.
    #[error("Translation store has no {0} left to assign")]
    Exhausted(&'static str),

    #[error("Failed to access translation snapshot: {0}")]
    Snapshot(#[from] std::io::Error),

    #[error("Failed to parse translation snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationFailure> for TranslationError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(vec![failure])
    }
}

fn format_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .enumerate()
        .map(|(i, failure)| format!("  {}. {} {}", i + 1, failure.field, failure.message))
        .collect::<Vec<_>>()
        .join("\n")
}
