//! Translation records: one row of attribute values per (owner, locale).

use std::collections::BTreeMap;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::overlay::PendingAttributes;

/// Identity of an owning entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a persisted translation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute values of one owner in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    /// `None` until the store persists the record
    #[serde(default)]
    pub id: Option<RecordId>,
    pub owner: OwnerId,
    /// Kept as a raw string so a blank locale can reach store validation.
    pub locale: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Option<String>>,
    /// Creation stamp assigned by the store; larger is newer.
    #[serde(default)]
    pub created_at: u64,
}

impl TranslationRecord {
    /// An unsaved record with no attribute values.
    #[must_use]
    pub fn new(owner: OwnerId, locale: impl Into<String>) -> Self {
        Self { id: None, owner, locale: locale.into(), fields: BTreeMap::new(), created_at: 0 }
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Stored value of `attribute`. Missing fields and nil both read as `None`.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.fields.get(attribute).and_then(Option::as_deref)
    }

    /// `true` when `attribute` holds a non-empty value.
    #[must_use]
    pub fn has_value(&self, attribute: &str) -> bool {
        self.get(attribute).is_some_and(|value| !value.is_empty())
    }

    /// Overwrites the named fields; fields not in `attributes` keep their values.
    pub fn merge(&mut self, attributes: &PendingAttributes) {
        for (attribute, value) in attributes {
            self.fields.insert(attribute.clone(), value.clone());
        }
    }

    /// Sets a single field and returns the record, for building fixtures.
    #[must_use]
    pub fn with_field(mut self, attribute: &str, value: Option<&str>) -> Self {
        self.fields.insert(attribute.to_string(), value.map(str::to_string));
        self
    }
}
