//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::locale::LocaleContext;
use crate::record::{
    OwnerId,
    TranslationRecord,
};
use crate::store::{
    MemoryStore,
    TranslationStore,
};

/// テスト用のロケールコンテキストを作成する
///
/// 利用可能なロケールは `en`, `fr`, `de`, `ja`
pub(crate) fn locale_context(active: &str, default: &str) -> LocaleContext {
    LocaleContext::new(
        active.into(),
        ["en".into(), "fr".into(), "de".into(), "ja".into()],
        default.into(),
    )
}

/// テスト用の翻訳レコードを保存する
///
/// # Arguments
/// * `store` - 保存先ストア
/// * `owner` - 所有エンティティ
/// * `locale` - ロケール（例: "en", "ja"）
/// * `fields` - 属性名と値の組
///
/// # Returns
/// 保存された翻訳レコード（後に保存したものほど新しい）
#[allow(clippy::unwrap_used)]
pub(crate) fn create_record(
    store: &mut MemoryStore,
    owner: OwnerId,
    locale: &str,
    fields: &[(&str, Option<&str>)],
) -> TranslationRecord {
    let mut record = fields
        .iter()
        .fold(TranslationRecord::new(owner, locale), |record, (attribute, value)| {
            record.with_field(attribute, *value)
        });
    store.persist(&mut record).unwrap();
    record
}
