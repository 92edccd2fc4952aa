//! Locale identifiers and the locale context passed to every resolution.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::translatable::Translatable;

/// A locale code such as `en` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks that `code` looks like a BCP 47 tag: a 2-3 letter language,
/// an optional 4 letter script, an optional 2 letter or 3 digit region.
///
/// Accepts `en`, `kok`, `pt-BR`, `az-Cyrl-AZ`, `es-419`.
#[must_use]
pub fn is_valid_locale_code(code: &str) -> bool {
    let mut parts = code.split('-');

    let Some(language) = parts.next() else {
        return false;
    };
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    let rest: Vec<&str> = parts.collect();
    match rest.as_slice() {
        [] => true,
        [region] => is_region(region),
        [script, region] => is_script(script) && is_region(region),
        _ => false,
    }
}

/// Script subtag (`Cyrl`, `Hant`).
fn is_script(part: &str) -> bool {
    part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic())
}

/// Region subtag (`BR`, `419`).
fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// The locales in effect for one unit of work.
///
/// Passed explicitly into every read so resolution never depends on hidden
/// state. Switching the active locale mid-request means building a new
/// context with [`LocaleContext::with_active`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    /// Locale of the current unit of work
    active: Locale,
    /// Every locale the application recognizes, in declaration order
    available: Vec<Locale>,
    /// Process-wide fallback locale
    default: Locale,
}

impl LocaleContext {
    /// Builds a context. Duplicate entries in `available` keep their first position.
    #[must_use]
    pub fn new(active: Locale, available: impl IntoIterator<Item = Locale>, default: Locale) -> Self {
        let mut locales: Vec<Locale> = Vec::new();
        for locale in available {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        Self { active, available: locales, default }
    }

    /// Same context under a different active locale.
    #[must_use]
    pub fn with_active(&self, active: impl Into<Locale>) -> Self {
        Self { active: active.into(), ..self.clone() }
    }

    #[must_use]
    pub const fn active_locale(&self) -> &Locale {
        &self.active
    }

    #[must_use]
    pub fn available_locales(&self) -> &[Locale] {
        &self.available
    }

    /// The process-wide default locale.
    #[must_use]
    pub const fn default_locale(&self) -> &Locale {
        &self.default
    }

    #[must_use]
    pub fn is_available(&self, locale: &Locale) -> bool {
        self.available.contains(locale)
    }

    /// Default locale for `entity`: its own override, then its type's, then
    /// the process-wide default.
    #[must_use]
    pub fn resolve_default<E: Translatable>(&self, entity: &E) -> Locale {
        entity.default_locale().unwrap_or_else(|| self.default.clone())
    }
}
