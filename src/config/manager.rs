//! 設定管理を行うモジュール

use std::path::Path;

use super::{
    ConfigError,
    GeneratorSettings,
    loader,
};

/// 1 回の生成で使う検証済みの設定を保持する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: GeneratorSettings,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: GeneratorSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// `config_path` が指定されていればワークスペースルートの
    /// `.lang-table.json` より優先する。どちらもなければデフォルト値。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(
        &mut self,
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(path) = config_path {
            loader::load_from_file(path)?
        } else {
            loader::load_from_workspace(workspace_root)?.map_or_else(
                GeneratorSettings::default,
                |ws| {
                    tracing::debug!("Loaded workspace settings: {:?}", ws);
                    ws
                },
            )
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する（コマンドライン引数による上書き用）
    ///
    /// # Errors
    /// バリデーションエラー。この場合は以前の設定を維持する
    pub fn update_settings(&mut self, new_settings: GeneratorSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &GeneratorSettings {
        &self.current_settings
    }
}
