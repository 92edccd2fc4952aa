//! 翻訳属性の保存から読み出しまでの一連の流れに関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use googletest::prelude::*;
use record_translations::{
    AttributeOverlay,
    Locale,
    LocaleContext,
    MemoryStore,
    OwnerId,
    Source,
    TranslationError,
    TranslationRecord,
    TranslationStore,
    ValidationFailure,
    after_save,
    save,
    translatable,
};
use rstest::*;

#[derive(Debug, Default)]
pub struct Post {
    id: Option<OwnerId>,
    translations: AttributeOverlay,
}

translatable! {
    Post {
        id: id,
        overlay: translations,
        attributes {
            title => title_mut,
            description => description_mut,
        }
    }
}

impl Post {
    fn load(id: u64) -> Self {
        Self { id: Some(OwnerId(id)), ..Self::default() }
    }
}

fn locales(active: &str, default: &str) -> LocaleContext {
    LocaleContext::new(active.into(), ["en".into(), "fr".into(), "de".into()], default.into())
}

/// Persists `title` in `locale` for post 1.
fn persist_title(store: &mut MemoryStore, locale: &str, title: &str) {
    let mut record = TranslationRecord::new(OwnerId(1), locale).with_field("title", Some(title));
    store.persist(&mut record).unwrap();
}

#[rstest]
fn set_value_is_readable_before_any_save() {
    let ctx = locales("fr", "en");
    let store = MemoryStore::new();
    let mut post = Post::default();

    post.title_mut().set(&ctx, Some("Bonjour"));

    assert_that!(post.title().get(&ctx, &store), some(eq("Bonjour")));
    assert_that!(store.is_empty(), eq(true));
}

#[rstest]
fn fixed_locale_getter_never_falls_back() {
    let ctx = locales("en", "en");
    let mut store = MemoryStore::new();
    persist_title(&mut store, "en", "Hello");
    let post = Post::load(1);

    assert_that!(post.title().get_in(&"fr".into(), &ctx, &store), none());
    assert_that!(post.title().get(&ctx.with_active("fr"), &store), some(eq("Hello")));
}

#[rstest]
fn generic_getter_uses_default_locale_before_first_record() {
    let ctx = locales("de", "fr");
    let mut store = MemoryStore::new();
    persist_title(&mut store, "fr", "Bonjour");
    persist_title(&mut store, "en", "");

    assert_that!(Post::load(1).title().get(&ctx, &store), some(eq("Bonjour")));
}

#[rstest]
fn generic_getter_returns_newest_record_even_when_empty() {
    let ctx = locales("de", "en");
    let mut store = MemoryStore::new();
    persist_title(&mut store, "fr", "Bonjour");
    persist_title(&mut store, "en", "");

    assert_that!(Post::load(1).title().get(&ctx, &store), some(eq("")));
}

#[rstest]
fn saved_value_survives_reload() {
    let ctx = locales("fr", "en");
    let mut store = MemoryStore::new();
    let mut post = Post::default();
    post.title_mut().set(&ctx, Some("Bonjour"));
    post.description_mut().set_in(&"en".into(), Some("A greeting"));

    let report = save(&mut post, &mut store, |post: &mut Post| {
        post.id = Some(OwnerId(1));
        Ok::<(), TranslationError>(())
    })
    .unwrap();

    assert_that!(report.inserted, len(eq(2)));
    let reloaded = Post::load(1);
    assert_that!(reloaded.title().get(&ctx, &store), some(eq("Bonjour")));
    assert_that!(reloaded.description().get_in(&"en".into(), &ctx, &store), some(eq("A greeting")));
    assert_that!(reloaded.title().before_type_cast(&ctx, &store), some(eq("Bonjour")));
}

#[rstest]
fn snapshot_reload_preserves_resolution() {
    let ctx = locales("en", "en");
    let mut store = MemoryStore::new();
    let mut post = Post::load(1);
    post.title_mut().set(&ctx, Some("Hello"));
    after_save(&mut post, &mut store).unwrap();

    let reloaded_store = MemoryStore::from_json_str(&store.to_json_string().unwrap()).unwrap();

    let resolution = record_translations::Resolver::new(&reloaded_store, &ctx)
        .resolve(&Post::load(1), "title")
        .unwrap();
    assert_that!(resolution.value, some(eq("Hello")));
    assert_that!(resolution.source, eq(Source::RequestedLocale));
}

#[rstest]
fn duplicate_locale_is_rejected_not_overwritten() {
    let mut store = MemoryStore::new();
    persist_title(&mut store, "en", "Hello");

    let mut duplicate = TranslationRecord::new(OwnerId(1), "en").with_field("title", Some("Other"));
    let Err(TranslationError::Validation(failures)) = store.persist(&mut duplicate) else {
        panic!("expected a validation failure");
    };

    assert_that!(failures, elements_are![field!(ValidationFailure.field, eq("locale"))]);
    let ctx = locales("en", "en");
    assert_that!(Post::load(1).title().get(&ctx, &store), some(eq("Hello")));
}

#[rstest]
fn bulk_accessor_covers_every_available_locale() {
    let ctx = locales("en", "en");
    let mut store = MemoryStore::new();
    persist_title(&mut store, "fr", "Bonjour");

    let all = Post::load(1).all_translations(&ctx, &store);

    assert_that!(all.len(), eq(3));
    assert_eq!(all[&Locale::from("fr")]["title"].as_deref(), Some("Bonjour"));
    assert_eq!(all[&Locale::from("fr")]["description"], None);
    for locale in ["en", "de"] {
        let values = &all[&Locale::from(locale)];
        assert_eq!(values["title"], None);
        assert_eq!(values["description"], None);
    }
}

#[rstest]
fn failed_flush_surfaces_error_and_keeps_pending_values() {
    let ctx = locales("en", "en");
    let mut store = MemoryStore::new();
    let mut post = Post::load(1);
    post.title_mut().set_in(&"".into(), Some("No locale"));

    let result = after_save(&mut post, &mut store);

    assert!(matches!(result, Err(TranslationError::Validation(_))));
    assert_that!(store.is_empty(), eq(true));
    assert_that!(post.title().get(&ctx, &store), none());
}
