//! 設定管理を行うモジュール

use std::path::Path;

use super::{
    ConfigError,
    TranslationSettings,
    ValidationError,
    loader,
};
use crate::locale::{
    Locale,
    LocaleContext,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TranslationSettings,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslationSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルがなければデフォルト値を使う。バリデーションに失敗した場合は
    /// 以前の設定を保持する。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_dir: Option<&Path>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", config_dir);

        let settings = match config_dir {
            Some(dir) => loader::load_from_dir(dir)?.unwrap_or_default(),
            None => TranslationSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定からロケールコンテキストを作成
    #[must_use]
    pub fn locale_context(&self) -> LocaleContext {
        self.current_settings.locale_context()
    }

    /// アクティブなロケールを差し替えたコンテキストを作成
    ///
    /// リクエスト単位でロケールを切り替えるときに使う。
    ///
    /// # Errors
    /// - `active` が `availableLocales` に含まれない
    pub fn locale_context_for(&self, active: &str) -> Result<LocaleContext, ConfigError> {
        let context = self.locale_context();
        let locale = Locale::from(active);

        if !context.is_available(&locale) {
            return Err(ConfigError::ValidationErrors(vec![ValidationError::new(
                "activeLocale",
                format!("Locale '{active}' must also be listed in availableLocales"),
            )]));
        }

        Ok(context.with_active(locale))
    }
}
