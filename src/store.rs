//! Persistence boundary for translation records.
//!
//! [`TranslationStore`] is what the resolver needs from a database. It
//! enforces that a record has a locale and that an owner has at most one
//! record per locale. [`MemoryStore`] implements it in memory and can be
//! loaded from and dumped to a JSON snapshot.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    TranslationError,
    ValidationFailure,
};
use crate::record::{
    OwnerId,
    RecordId,
    TranslationRecord,
};

pub trait TranslationStore {
    /// Existing record of `owner` in `locale`, or a new unsaved record with no values.
    fn find_or_initialize(
        &self,
        owner: OwnerId,
        locale: &str,
    ) -> Result<TranslationRecord, TranslationError>;

    /// Records of `owner`, most recently created first.
    fn list(&self, owner: OwnerId) -> Result<Vec<TranslationRecord>, TranslationError>;

    /// Inserts or updates `record`.
    ///
    /// On insert the store assigns `id` and `created_at`. A record with a blank
    /// locale, or a second record for the same (owner, locale), is rejected with
    /// [`TranslationError::Validation`] and nothing is written.
    fn persist(&mut self, record: &mut TranslationRecord) -> Result<(), TranslationError>;

    /// Deletes every record of `owner`, returning how many were removed.
    fn delete_all(&mut self, owner: OwnerId) -> Result<usize, TranslationError>;
}

/// In-memory [`TranslationStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    records: Vec<TranslationRecord>,
    /// Last assigned record id
    #[serde(default)]
    last_id: u64,
    /// Logical creation clock
    #[serde(default)]
    clock: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot produced by [`MemoryStore::to_json_string`] or written by hand.
    ///
    /// Records without an id or creation stamp are assigned one in file order,
    /// so later entries count as newer. A snapshot holding a blank locale, two
    /// records for one (owner, locale) or a repeated id is rejected whole.
    pub fn from_json_str(json: &str) -> Result<Self, TranslationError> {
        let mut store: Self = serde_json::from_str(json)?;
        store.normalize()?;
        store.check_loaded()?;
        Ok(store)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TranslationError> {
        tracing::debug!("Loading translation snapshot from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, TranslationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Brings `last_id` and `clock` in line with the loaded records.
    fn normalize(&mut self) -> Result<(), TranslationError> {
        let max_id = self.records.iter().filter_map(|r| r.id).map(|id| id.0).max().unwrap_or(0);
        let max_stamp = self.records.iter().map(|r| r.created_at).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_id);
        self.clock = self.clock.max(max_stamp);

        for record in &mut self.records {
            if record.id.is_none() {
                self.last_id = advance(self.last_id, "record id")?;
                record.id = Some(RecordId(self.last_id));
            }
            if record.created_at == 0 {
                self.clock = advance(self.clock, "creation stamp")?;
                record.created_at = self.clock;
            }
        }

        Ok(())
    }

    /// Rejects loaded records that `persist` would never have accepted.
    fn check_loaded(&self) -> Result<(), TranslationError> {
        let mut failures = Vec::new();
        let mut locales = BTreeSet::new();
        let mut ids = BTreeSet::new();

        for record in &self.records {
            if record.locale.trim().is_empty() {
                failures.push(ValidationFailure::missing_locale());
            } else if !locales.insert((record.owner, record.locale.as_str())) {
                failures.push(ValidationFailure::duplicate_locale(&record.locale));
            }
            if let Some(id) = record.id
                && !ids.insert(id)
            {
                failures.push(ValidationFailure::duplicate_id(id));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            tracing::warn!("Rejected translation snapshot with {} invalid records", failures.len());
            Err(TranslationError::Validation(failures))
        }
    }

    fn validate(&self, record: &TranslationRecord) -> Result<(), TranslationError> {
        let mut failures = Vec::new();

        if record.locale.trim().is_empty() {
            failures.push(ValidationFailure::missing_locale());
        } else if self.records.iter().any(|existing| {
            existing.owner == record.owner
                && existing.locale == record.locale
                && existing.id != record.id
        }) {
            failures.push(ValidationFailure::duplicate_locale(&record.locale));
        }

        if failures.is_empty() { Ok(()) } else { Err(TranslationError::Validation(failures)) }
    }
}

fn advance(counter: u64, what: &'static str) -> Result<u64, TranslationError> {
    counter.checked_add(1).ok_or(TranslationError::Exhausted(what))
}

impl TranslationStore for MemoryStore {
    fn find_or_initialize(
        &self,
        owner: OwnerId,
        locale: &str,
    ) -> Result<TranslationRecord, TranslationError> {
        Ok(self
            .records
            .iter()
            .find(|record| record.owner == owner && record.locale == locale)
            .cloned()
            .unwrap_or_else(|| TranslationRecord::new(owner, locale)))
    }

    fn list(&self, owner: OwnerId) -> Result<Vec<TranslationRecord>, TranslationError> {
        let mut records: Vec<TranslationRecord> =
            self.records.iter().filter(|record| record.owner == owner).cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }

    fn persist(&mut self, record: &mut TranslationRecord) -> Result<(), TranslationError> {
        self.validate(record)?;

        if let Some(id) = record.id {
            let slot = self
                .records
                .iter_mut()
                .find(|existing| existing.id == Some(id))
                .ok_or(TranslationError::UnknownRecord(id))?;
            *slot = record.clone();
            tracing::debug!(%id, locale = %record.locale, "Updated translation record");
        } else {
            let last_id = advance(self.last_id, "record id")?;
            let clock = advance(self.clock, "creation stamp")?;
            let id = RecordId(last_id);
            (self.last_id, self.clock) = (last_id, clock);
            record.id = Some(id);
            record.created_at = clock;
            self.records.push(record.clone());
            tracing::debug!(%id, locale = %record.locale, "Inserted translation record");
        }

        Ok(())
    }

    fn delete_all(&mut self, owner: OwnerId) -> Result<usize, TranslationError> {
        let before = self.records.len();
        self.records.retain(|record| record.owner != owner);
        Ok(before - self.records.len())
    }
}
