//! Opt-in translated attributes for owning entities.
//!
//! A record type implements [`Translatable`] (normally through the
//! [`translatable!`](crate::translatable!) macro) to declare which of its
//! attributes live in per-locale translation records.

use crate::locale::{
    Locale,
    LocaleContext,
};
use crate::overlay::AttributeOverlay;
use crate::record::OwnerId;
use crate::resolver::{
    AllTranslations,
    Resolver,
};
use crate::store::TranslationStore;

/// A record type whose attributes are stored per locale.
pub trait Translatable {
    /// Names of the translated attributes, in declaration order.
    const ATTRIBUTES: &'static [&'static str];

    /// Type-level default locale; `None` defers to the process-wide default.
    const DEFAULT_LOCALE: Option<&'static str> = None;

    /// Identity of the entity once it has been persisted.
    fn owner_id(&self) -> Option<OwnerId>;

    fn overlay(&self) -> &AttributeOverlay;

    fn overlay_mut(&mut self) -> &mut AttributeOverlay;

    /// Instance-level default locale. Falls back to [`Translatable::DEFAULT_LOCALE`].
    fn default_locale(&self) -> Option<Locale> {
        Self::DEFAULT_LOCALE.map(Locale::from)
    }
}

/// Read access to one translated attribute of an entity.
#[derive(Debug)]
pub struct AttributeRef<'e, E> {
    entity: &'e E,
    name: &'static str,
}

impl<E> Clone for AttributeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for AttributeRef<'_, E> {}

impl<'e, E: Translatable> AttributeRef<'e, E> {
    #[must_use]
    pub const fn new(entity: &'e E, name: &'static str) -> Self {
        Self { entity, name }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Value in the active locale, with default-locale and first-record fallback.
    #[must_use]
    pub fn get<S: TranslationStore>(&self, locales: &LocaleContext, store: &S) -> Option<String> {
        Resolver::new(store, locales).read(self.entity, self.name)
    }

    /// Same as [`AttributeRef::get`]; values are never type-cast.
    #[must_use]
    pub fn before_type_cast<S: TranslationStore>(
        &self,
        locales: &LocaleContext,
        store: &S,
    ) -> Option<String> {
        self.get(locales, store)
    }

    /// Value in exactly `locale`, without fallback.
    #[must_use]
    pub fn get_in<S: TranslationStore>(
        &self,
        locale: &Locale,
        locales: &LocaleContext,
        store: &S,
    ) -> Option<String> {
        Resolver::new(store, locales).read_in(self.entity, locale, self.name)
    }
}

/// Write access to one translated attribute of an entity.
///
/// Writes only stage values in the entity's overlay; they reach the store on
/// the next [`crate::resolver::after_save`].
#[derive(Debug)]
pub struct AttributeMut<'e, E> {
    entity: &'e mut E,
    name: &'static str,
}

impl<'e, E: Translatable> AttributeMut<'e, E> {
    #[must_use]
    pub fn new(entity: &'e mut E, name: &'static str) -> Self {
        Self { entity, name }
    }

    /// Stages `value` under the active locale.
    pub fn set(&mut self, locales: &LocaleContext, value: Option<impl Into<String>>) {
        let locale = locales.active_locale().clone();
        self.set_in(&locale, value);
    }

    /// Stages `value` under `locale`.
    pub fn set_in(&mut self, locale: &Locale, value: Option<impl Into<String>>) {
        self.entity.overlay_mut().set(locale, self.name, value.map(Into::into));
    }

    #[must_use]
    pub fn get<S: TranslationStore>(&self, locales: &LocaleContext, store: &S) -> Option<String> {
        Resolver::new(store, locales).read(&*self.entity, self.name)
    }
}

/// Every available locale mapped to the persisted values of every attribute of `entity`.
#[must_use]
pub fn all_translations<E: Translatable, S: TranslationStore>(
    entity: &E,
    locales: &LocaleContext,
    store: &S,
) -> AllTranslations {
    Resolver::new(store, locales).read_all(entity)
}

/// Declares translated attributes on a record type.
///
/// ```
/// use record_translations::{AttributeOverlay, OwnerId, translatable};
///
/// #[derive(Debug, Default)]
/// pub struct Post {
///     id: Option<OwnerId>,
///     translations: AttributeOverlay,
/// }
///
/// translatable! {
///     Post {
///         id: id,
///         overlay: translations,
///         default_locale: "en",
///         attributes {
///             title => title_mut,
///             body => body_mut,
///         }
///     }
/// }
/// ```
///
/// For every `attribute => attribute_mut` pair this generates
/// `fn attribute(&self) -> AttributeRef<'_, Self>` and
/// `fn attribute_mut(&mut self) -> AttributeMut<'_, Self>`, plus
/// `all_translations` for the bulk read. `default_locale_with: method` wires
/// an instance-level default locale (`fn method(&self) -> Option<Locale>`).
#[macro_export]
macro_rules! translatable {
    (
        $entity:ty {
            id: $id:ident,
            overlay: $overlay:ident,
            $(default_locale: $default:literal,)?
            $(default_locale_with: $default_with:ident,)?
            attributes {
                $($attribute:ident => $attribute_mut:ident),+ $(,)?
            } $(,)?
        }
    ) => {
        impl $crate::Translatable for $entity {
            const ATTRIBUTES: &'static [&'static str] = &[$(stringify!($attribute)),+];

            $(const DEFAULT_LOCALE: Option<&'static str> = Some($default);)?

            fn owner_id(&self) -> Option<$crate::OwnerId> {
                self.$id
            }

            fn overlay(&self) -> &$crate::AttributeOverlay {
                &self.$overlay
            }

            fn overlay_mut(&mut self) -> &mut $crate::AttributeOverlay {
                &mut self.$overlay
            }

            $(
                fn default_locale(&self) -> Option<$crate::Locale> {
                    self.$default_with().or_else(|| {
                        <Self as $crate::Translatable>::DEFAULT_LOCALE.map($crate::Locale::from)
                    })
                }
            )?
        }

        impl $entity {
            $(
                #[must_use]
                pub const fn $attribute(&self) -> $crate::AttributeRef<'_, Self> {
                    $crate::AttributeRef::new(self, stringify!($attribute))
                }

                #[must_use]
                pub fn $attribute_mut(&mut self) -> $crate::AttributeMut<'_, Self> {
                    $crate::AttributeMut::new(self, stringify!($attribute))
                }
            )+

            #[must_use]
            pub fn all_translations<S: $crate::TranslationStore>(
                &self,
                locales: &$crate::LocaleContext,
                store: &S,
            ) -> $crate::AllTranslations {
                $crate::translatable::all_translations(self, locales, store)
            }
        }
    };
}
