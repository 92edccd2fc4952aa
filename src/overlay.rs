//! 未保存の翻訳属性を保持するオーバーレイ
//!
//! 所有エンティティのインスタンスごとに 1 つ存在し、保存時に
//! [`crate::resolver::flush`] で翻訳レコードへ書き出されるまで
//! ロケール単位で編集内容をバッファリングします。

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use crate::locale::Locale;

/// 属性名 → 保留中の値
///
/// `None` は明示的に nil が設定されたことを表す。
pub type PendingAttributes = BTreeMap<String, Option<String>>;

/// ロケール → 保留中の属性
///
/// 空の `BTreeMap` はアロケーションを伴わないため、最初の書き込みまで
/// 実体は作られない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOverlay {
    /// ロケールごとの保留値
    pending: BTreeMap<Locale, PendingAttributes>,
}

impl AttributeOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を保留する
    ///
    /// 同じ (ロケール, 属性) の既存の保留値は上書きされる。
    /// 未知のロケールでも失敗せず、空のマップを作成してから書き込む。
    pub fn set(&mut self, locale: &Locale, attribute: &str, value: Option<String>) {
        self.locale_entry(locale).insert(attribute.to_string(), value);
    }

    /// 保留値を取得する
    ///
    /// # Returns
    /// - `None`: 保留値なし
    /// - `Some(None)`: nil が保留されている
    /// - `Some(Some(v))`: 値が保留されている
    #[must_use]
    pub fn get(&self, locale: &Locale, attribute: &str) -> Option<&Option<String>> {
        self.pending.get(locale).and_then(|attributes| attributes.get(attribute))
    }

    /// 永続化済みの値を隠す保留値
    ///
    /// nil の保留は隠さない（永続化済みの値が読まれる）。空文字列は隠す。
    #[must_use]
    pub fn pending(&self, locale: &Locale, attribute: &str) -> Option<&str> {
        self.get(locale, attribute).and_then(Option::as_deref)
    }

    /// 保留中の属性が 1 つもない場合に `true`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.values().all(BTreeMap::is_empty)
    }

    /// 保留中の (ロケール, 属性) の数
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.values().map(BTreeMap::len).sum()
    }

    /// 保留中の属性を持つロケールの一覧
    #[must_use]
    pub fn all_locales_with_pending(&self) -> BTreeSet<Locale> {
        self.pending
            .iter()
            .filter(|(_, attributes)| !attributes.is_empty())
            .map(|(locale, _)| locale.clone())
            .collect()
    }

    #[must_use]
    pub fn attributes_for(&self, locale: &Locale) -> Option<&PendingAttributes> {
        self.pending.get(locale).filter(|attributes| !attributes.is_empty())
    }

    /// 指定ロケールの保留値を取り除く（書き出し完了後に使用）
    pub fn discard(&mut self, locale: &Locale) -> Option<PendingAttributes> {
        self.pending.remove(locale)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// ロケールのマップを取得し、なければ空のマップを挿入する
    fn locale_entry(&mut self, locale: &Locale) -> &mut PendingAttributes {
        self.pending.entry(locale.clone()).or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn en() -> Locale {
        Locale::from("en")
    }

    fn ja() -> Locale {
        Locale::from("ja")
    }

    #[rstest]
    fn new_overlay_is_empty() {
        let overlay = AttributeOverlay::new();

        assert_that!(overlay.is_empty(), eq(true));
        assert_that!(overlay.len(), eq(0));
        assert_that!(overlay.all_locales_with_pending().is_empty(), eq(true));
    }

    #[rstest]
    fn set_then_get_returns_value() {
        let mut overlay = AttributeOverlay::new();

        overlay.set(&en(), "title", Some("Hello".to_string()));

        assert_that!(overlay.get(&en(), "title").cloned(), some(some(eq("Hello"))));
        assert_that!(overlay.get(&ja(), "title").cloned(), none());
        assert_that!(overlay.get(&en(), "body").cloned(), none());
    }

    #[rstest]
    fn set_overwrites_previous_value() {
        let mut overlay = AttributeOverlay::new();

        overlay.set(&en(), "title", Some("first".to_string()));
        overlay.set(&en(), "title", Some("second".to_string()));

        assert_eq!(overlay.pending(&en(), "title"), Some("second"));
        assert_that!(overlay.len(), eq(1));
    }

    #[rstest]
    fn pending_nil_is_distinct_from_absent() {
        let mut overlay = AttributeOverlay::new();

        overlay.set(&en(), "title", None);

        assert_that!(overlay.get(&en(), "title").cloned(), some(none()));
        assert_eq!(overlay.pending(&en(), "title"), None);
        assert_that!(overlay.is_empty(), eq(false));
    }

    #[rstest]
    fn pending_empty_string_shadows() {
        let mut overlay = AttributeOverlay::new();

        overlay.set(&en(), "title", Some(String::new()));

        assert_eq!(overlay.pending(&en(), "title"), Some(""));
    }

    #[rstest]
    fn all_locales_with_pending_lists_written_locales() {
        let mut overlay = AttributeOverlay::new();

        overlay.set(&ja(), "title", Some("こんにちは".to_string()));
        overlay.set(&en(), "title", Some("Hello".to_string()));
        overlay.set(&en(), "body", Some("World".to_string()));

        assert_that!(overlay.all_locales_with_pending().into_iter().collect::<Vec<_>>(), elements_are![eq(&en()), eq(&ja())]);
        assert_that!(overlay.len(), eq(3));
        assert_that!(overlay.attributes_for(&en()).map(BTreeMap::len), some(eq(2)));
    }

    #[rstest]
    fn discard_and_clear_remove_pending_values() {
        let mut overlay = AttributeOverlay::new();
        overlay.set(&ja(), "title", Some("こんにちは".to_string()));
        overlay.set(&en(), "title", Some("Hello".to_string()));

        let discarded = overlay.discard(&ja());

        assert_that!(discarded.map(|attrs| attrs.len()), some(eq(1)));
        assert_that!(overlay.all_locales_with_pending().into_iter().collect::<Vec<_>>(), elements_are![eq(&en())]);

        overlay.clear();

        assert_that!(overlay.is_empty(), eq(true));
    }
}
