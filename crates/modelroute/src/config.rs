use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::catalog::{self, ModelCatalog};
use crate::cli_status::{CursorCliProbe, DEFAULT_CURSOR_BINARY, DEFAULT_STATUS_TIMEOUT};
use crate::settings::{ModelSettings, Phase};

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub models: Option<ModelsCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelsCfg {
    /// Optional TOML file merged over the built-in catalog.
    pub catalog_file: Option<String>,
    /// Fallback used when a key is absent or unknown.
    pub default_model: Option<String>,
    pub enabled_cursor_models: Option<Vec<String>>,
    pub cursor_default_model: Option<String>,
    pub cursor_binary: Option<String>,
    pub status_timeout_ms: Option<u64>,
    pub phases: Option<BTreeMap<Phase, String>>,
}

/// Resolve the home directory: explicit override, then `$HOME/.modelroute`,
/// then `./.modelroute`.
pub fn modelroute_home(explicit: &str) -> PathBuf {
    if !explicit.is_empty() {
        PathBuf::from(explicit)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".modelroute")
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".modelroute")
    }
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join("config.toml");
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: UserConfig =
        toml::from_str(&s).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

impl ModelsCfg {
    /// Built-in catalog, merged with `catalog_file` when set.
    pub fn catalog(&self) -> anyhow::Result<ModelCatalog> {
        match self.catalog_file.as_deref() {
            Some(path) => catalog::load_from_file(&expand_home(path)),
            None => Ok(catalog::load_default()),
        }
    }

    /// Build a settings snapshot by replaying the configured choices through
    /// the settings operations, so config obeys the same rules as updates.
    pub fn settings(&self, catalog: &ModelCatalog) -> anyhow::Result<ModelSettings> {
        let mut settings = ModelSettings::default();
        for id in self.enabled_cursor_models.iter().flatten() {
            settings = settings
                .toggle_cursor_model(catalog, id, true)
                .context("models.enabled_cursor_models")?;
        }
        if let Some(id) = self.cursor_default_model.as_deref() {
            settings = settings
                .with_cursor_default_model(id)
                .context("models.cursor_default_model")?;
        }
        for (phase, model) in self.phases.iter().flatten() {
            settings = settings
                .with_phase_model(catalog, *phase, model)
                .with_context(|| format!("models.phases.{}", phase))?;
        }
        Ok(settings)
    }

    pub fn status_probe(&self) -> CursorCliProbe {
        let binary = self
            .cursor_binary
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CURSOR_BINARY));
        let timeout = self
            .status_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STATUS_TIMEOUT);
        CursorCliProbe::new(binary, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_user_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn parses_full_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
[logging]
level = "debug"
to_file = false

[models]
default_model = "sonnet"
enabled_cursor_models = ["composer-1", "cursor-grok"]
cursor_default_model = "grok"
status_timeout_ms = 250

[models.phases]
validation = "composer-1"
spec_generation = "haiku"
"#,
        )
        .unwrap();
        let cfg = load_user_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            cfg.logging.as_ref().and_then(|l| l.level.as_deref()),
            Some("debug")
        );
        let models = cfg.models.unwrap();
        let catalog = models.catalog().unwrap();
        let settings = models.settings(&catalog).unwrap();
        assert_eq!(
            settings.enabled_cursor_models(),
            ["auto".to_string(), "composer-1".to_string(), "grok".to_string()]
        );
        assert_eq!(settings.cursor_default_model(), "grok");
        assert_eq!(settings.phase_model(Phase::Validation), "composer-1");
        assert_eq!(settings.phase_model(Phase::SpecGeneration), "haiku");
        assert_eq!(models.status_probe().timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_settings_are_reported_with_key() {
        let models = ModelsCfg {
            cursor_default_model: Some("grok".into()),
            ..Default::default()
        };
        let err = models.settings(ModelCatalog::builtin()).unwrap_err();
        assert!(format!("{:#}", err).contains("models.cursor_default_model"));
    }

    #[test]
    fn catalog_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            "[[cursor_models]]\nid = \"kimi-k2\"\n",
        )
        .unwrap();
        let models = ModelsCfg {
            catalog_file: Some(path.display().to_string()),
            enabled_cursor_models: Some(vec!["kimi-k2".into()]),
            ..Default::default()
        };
        let catalog = models.catalog().unwrap();
        assert!(models.settings(&catalog).unwrap().is_cursor_model_enabled("kimi-k2"));
    }

    #[test]
    fn unknown_phase_key_fails_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[models.phases]\nnot_a_phase = \"opus\"\n",
        )
        .unwrap();
        assert!(load_user_config(dir.path()).is_err());
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
