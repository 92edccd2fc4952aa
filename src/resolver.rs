//! Translated attribute resolution and flushing.
//!
//! # Read fallback
//!
//! A read of attribute `a` under locale `L` returns the first of:
//! 1. a value staged in the overlay for (`L`, `a`)
//! 2. nothing, if the entity has never been persisted
//! 3. the record for `L`, if its `a` is non-empty
//! 4. the record for the entity's default locale, if its `a` is non-empty
//! 5. the most recently created record, whatever its `a` holds
//!
//! Fixed-locale reads ([`Resolver::read_in`]) stop after step 3.
//!
//! # Flush
//!
//! [`after_save`] merges every staged locale into its translation record
//! (creating it when missing) and persists it. The first failure stops the
//! flush; locales already written are dropped from the overlay and the rest
//! stay staged.

use std::collections::BTreeMap;

use crate::error::TranslationError;
use crate::locale::{
    Locale,
    LocaleContext,
};
use crate::record::{
    OwnerId,
    TranslationRecord,
};
use crate::store::TranslationStore;
use crate::translatable::Translatable;

/// Locale → attribute → persisted value.
pub type AllTranslations = BTreeMap<Locale, BTreeMap<String, Option<String>>>;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Staged in the overlay, not yet persisted
    Pending,
    /// Record of the requested locale
    RequestedLocale,
    /// Record of the default locale
    DefaultLocale,
    /// Most recently created record, used as a last resort
    FirstRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `None` when the selected record holds nil for the attribute.
    pub value: Option<String>,
    pub locale: Locale,
    pub source: Source,
}

impl Resolution {
    fn from_record(record: &TranslationRecord, attribute: &str, source: Source) -> Self {
        Self {
            value: record.get(attribute).map(str::to_string),
            locale: Locale::from(record.locale.as_str()),
            source,
        }
    }
}

/// Reads translated attributes of an entity.
///
/// Cheap to build; create one per call site with the context of the
/// current unit of work.
#[derive(Debug)]
pub struct Resolver<'a, S> {
    store: &'a S,
    locales: &'a LocaleContext,
}

impl<S> Clone for Resolver<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Resolver<'_, S> {}

impl<'a, S: TranslationStore> Resolver<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, locales: &'a LocaleContext) -> Self {
        Self { store, locales }
    }

    /// Value of `attribute` in the active locale, with fallback.
    #[must_use]
    pub fn read<E: Translatable>(&self, entity: &E, attribute: &str) -> Option<String> {
        self.resolve(entity, attribute).and_then(|resolution| resolution.value)
    }

    /// Value of `attribute` in exactly `locale`. Never substitutes another locale.
    #[must_use]
    pub fn read_in<E: Translatable>(
        &self,
        entity: &E,
        locale: &Locale,
        attribute: &str,
    ) -> Option<String> {
        self.resolve_in(entity, locale, attribute).and_then(|resolution| resolution.value)
    }

    /// Like [`Resolver::read`], also reporting which tier supplied the value.
    #[must_use]
    pub fn resolve<E: Translatable>(&self, entity: &E, attribute: &str) -> Option<Resolution> {
        let active = self.locales.active_locale();

        if let Some(resolution) = pending(entity, active, attribute) {
            return Some(resolution);
        }

        let owner = entity.owner_id()?;
        let records = self.records(owner);
        let default = self.locales.resolve_default(entity);

        let resolution = find_with_value(&records, active, attribute)
            .map(|record| Resolution::from_record(record, attribute, Source::RequestedLocale))
            .or_else(|| {
                find_with_value(&records, &default, attribute)
                    .map(|record| Resolution::from_record(record, attribute, Source::DefaultLocale))
            })
            .or_else(|| {
                records
                    .first()
                    .map(|record| Resolution::from_record(record, attribute, Source::FirstRecord))
            });

        tracing::debug!(
            %owner,
            attribute,
            active = %active,
            default = %default,
            source = ?resolution.as_ref().map(|r| r.source),
            "Resolved translated attribute"
        );

        resolution
    }

    /// Like [`Resolver::read_in`], also reporting which tier supplied the value.
    #[must_use]
    pub fn resolve_in<E: Translatable>(
        &self,
        entity: &E,
        locale: &Locale,
        attribute: &str,
    ) -> Option<Resolution> {
        if let Some(resolution) = pending(entity, locale, attribute) {
            return Some(resolution);
        }

        let owner = entity.owner_id()?;
        let records = self.records(owner);

        find_with_value(&records, locale, attribute)
            .map(|record| Resolution::from_record(record, attribute, Source::RequestedLocale))
    }

    /// Persisted value of every attribute in every available locale.
    ///
    /// Neither staged values nor fallback apply. Locales without a record map
    /// every attribute to `None`.
    #[must_use]
    pub fn read_all<E: Translatable>(&self, entity: &E) -> AllTranslations {
        let records = entity.owner_id().map(|owner| self.records(owner)).unwrap_or_default();

        let mut by_locale: BTreeMap<&str, &TranslationRecord> = BTreeMap::new();
        for record in &records {
            by_locale.entry(record.locale.as_str()).or_insert(record);
        }

        self.locales
            .available_locales()
            .iter()
            .map(|locale| {
                let record = by_locale.get(locale.as_str());
                let values = E::ATTRIBUTES
                    .iter()
                    .map(|attribute| {
                        let value = record.and_then(|r| r.get(attribute)).map(str::to_string);
                        ((*attribute).to_string(), value)
                    })
                    .collect();
                (locale.clone(), values)
            })
            .collect()
    }

    /// Records of `owner`, newest first. A failing store reads as no records.
    fn records(&self, owner: OwnerId) -> Vec<TranslationRecord> {
        match self.store.list(owner) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to list translations of owner {}: {}", owner, e);
                Vec::new()
            }
        }
    }
}

/// Staged value that shadows persisted data. A staged nil does not shadow.
fn pending<E: Translatable>(entity: &E, locale: &Locale, attribute: &str) -> Option<Resolution> {
    entity.overlay().pending(locale, attribute).map(|value| Resolution {
        value: Some(value.to_string()),
        locale: locale.clone(),
        source: Source::Pending,
    })
}

fn find_with_value<'r>(
    records: &'r [TranslationRecord],
    locale: &Locale,
    attribute: &str,
) -> Option<&'r TranslationRecord> {
    records.iter().find(|record| record.locale == locale.as_str() && record.has_value(attribute))
}

/// Locales written by one flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Locales that got a new record
    pub inserted: Vec<Locale>,
    /// Locales whose existing record was updated
    pub updated: Vec<Locale>,
}

impl FlushReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

/// Writes the overlay of `entity` into its translation records.
///
/// An empty overlay is a no-op, even for an entity that was never persisted.
/// Each locale is merged and persisted on its own; the first failure is
/// returned and leaves that locale and the ones after it staged.
pub fn flush<E: Translatable, S: TranslationStore>(
    entity: &mut E,
    store: &mut S,
) -> Result<FlushReport, TranslationError> {
    let mut report = FlushReport::default();

    if entity.overlay().is_empty() {
        tracing::debug!("Nothing to flush");
        return Ok(report);
    }

    let owner = entity.owner_id().ok_or(TranslationError::NotPersisted)?;

    for locale in entity.overlay().all_locales_with_pending() {
        let Some(attributes) = entity.overlay().attributes_for(&locale) else {
            continue;
        };

        let mut record = store.find_or_initialize(owner, locale.as_str())?;
        let inserting = !record.is_persisted();
        record.merge(attributes);

        if let Err(e) = store.persist(&mut record) {
            tracing::warn!("Failed to persist {} translation of owner {}: {}", locale, owner, e);
            return Err(e);
        }

        entity.overlay_mut().discard(&locale);
        tracing::debug!(%owner, %locale, inserting, "Flushed translation");

        if inserting {
            report.inserted.push(locale);
        } else {
            report.updated.push(locale);
        }
    }

    Ok(report)
}

/// Post-save hook. Call once the owning entity's own row is persisted.
pub fn after_save<E: Translatable, S: TranslationStore>(
    entity: &mut E,
    store: &mut S,
) -> Result<FlushReport, TranslationError> {
    if entity.owner_id().is_none() {
        return Err(TranslationError::NotPersisted);
    }
    flush(entity, store)
}

/// Persists the owning entity with `save_owner`, then flushes its translations
/// before returning.
///
/// `save_owner` must assign the entity its identity. If it fails, no
/// translation is written.
pub fn save<E, S, F, Err>(entity: &mut E, store: &mut S, save_owner: F) -> Result<FlushReport, Err>
where
    E: Translatable,
    S: TranslationStore,
    F: FnOnce(&mut E) -> Result<(), Err>,
    Err: From<TranslationError>,
{
    save_owner(entity)?;
    Ok(after_save(entity, store)?)
}

/// Deletes every translation record of `entity` and drops its staged values.
pub fn destroy<E: Translatable, S: TranslationStore>(
    entity: &mut E,
    store: &mut S,
) -> Result<usize, TranslationError> {
    entity.overlay_mut().clear();

    let Some(owner) = entity.owner_id() else {
        return Ok(0);
    };

    let removed = store.delete_all(owner)?;
    tracing::debug!(%owner, removed, "Deleted translations");
    Ok(removed)
}
