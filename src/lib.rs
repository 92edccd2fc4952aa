//! record-translations
//!
//! レコードの属性をロケールごとの翻訳レコードに保存し、アクティブなロケール、
//! デフォルトロケール、最初の翻訳の順にフォールバックして読み出す。

pub mod config;
pub mod error;
pub mod locale;
pub mod overlay;
pub mod record;
pub mod resolver;
pub mod store;
pub mod translatable;

#[cfg(test)]
mod test_utils;

pub use error::{
    TranslationError,
    ValidationFailure,
};
pub use locale::{
    Locale,
    LocaleContext,
};
pub use overlay::AttributeOverlay;
pub use record::{
    OwnerId,
    RecordId,
    TranslationRecord,
};
pub use resolver::{
    AllTranslations,
    FlushReport,
    Resolution,
    Resolver,
    Source,
    after_save,
    destroy,
    flush,
    save,
};
pub use store::{
    MemoryStore,
    TranslationStore,
};
pub use translatable::{
    AttributeMut,
    AttributeRef,
    Translatable,
};
