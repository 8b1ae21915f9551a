//! Model selection settings as immutable snapshots.
//!
//! Every update returns a new `ModelSettings`; the receiver is never modified.
//! Holders swap the snapshot they keep once the update succeeds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ModelCatalog;
use crate::catalog::default::CURSOR_AUTO;
use crate::provider::{ProviderFamily, strip_provider_prefix};
use crate::resolver::ModelResolver;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown cursor model '{0}'")]
    UnknownCursorModel(String),
    #[error("cursor model '{0}' is not enabled")]
    CursorModelNotEnabled(String),
    #[error("'{model}' is not an available model for phase {phase}")]
    UnavailablePhaseModel { phase: Phase, model: String },
    #[error("unknown phase '{0}'")]
    UnknownPhase(String),
}

/// Workflow phases that each carry their own model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Enhancement,
    FileDescription,
    ImageDescription,
    Validation,
    SpecGeneration,
    FeatureGeneration,
    BacklogPlanning,
    ProjectAnalysis,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Enhancement,
        Phase::FileDescription,
        Phase::ImageDescription,
        Phase::Validation,
        Phase::SpecGeneration,
        Phase::FeatureGeneration,
        Phase::BacklogPlanning,
        Phase::ProjectAnalysis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Enhancement => "enhancement",
            Phase::FileDescription => "file_description",
            Phase::ImageDescription => "image_description",
            Phase::Validation => "validation",
            Phase::SpecGeneration => "spec_generation",
            Phase::FeatureGeneration => "feature_generation",
            Phase::BacklogPlanning => "backlog_planning",
            Phase::ProjectAnalysis => "project_analysis",
        }
    }

    /// Built-in alias used until the user picks something else.
    pub fn default_model(self) -> &'static str {
        match self {
            Phase::FileDescription | Phase::ImageDescription => "haiku",
            Phase::SpecGeneration => "opus",
            _ => "sonnet",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownPhase(s.to_string()))
    }
}

/// One selectable entry in a phase model picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseChoice {
    /// Value stored in settings: a Claude alias or a bare Cursor id.
    pub value: String,
    pub label: String,
    pub family: ProviderFamily,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    enabled_cursor_models: Vec<String>,
    cursor_default_model: String,
    phase_models: BTreeMap<Phase, String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            enabled_cursor_models: vec![CURSOR_AUTO.to_string()],
            cursor_default_model: CURSOR_AUTO.to_string(),
            phase_models: Phase::ALL
                .into_iter()
                .map(|p| (p, p.default_model().to_string()))
                .collect(),
        }
    }
}

impl ModelSettings {
    /// Enabled Cursor ids (bare) in the order they were enabled.
    pub fn enabled_cursor_models(&self) -> &[String] {
        &self.enabled_cursor_models
    }

    pub fn cursor_default_model(&self) -> &str {
        &self.cursor_default_model
    }

    pub fn is_cursor_model_enabled(&self, id: &str) -> bool {
        let id = strip_provider_prefix(id);
        self.enabled_cursor_models.iter().any(|m| m == id)
    }

    pub fn phase_model(&self, phase: Phase) -> &str {
        self.phase_models
            .get(&phase)
            .map(String::as_str)
            .unwrap_or_else(|| phase.default_model())
    }

    /// Enable or disable a Cursor model. `auto` always stays enabled.
    /// Disabling a model moves the default back to `auto` and any phase using
    /// it back to that phase's built-in alias.
    pub fn toggle_cursor_model(
        &self,
        catalog: &ModelCatalog,
        id: &str,
        enabled: bool,
    ) -> Result<ModelSettings, SettingsError> {
        let id = strip_provider_prefix(id);
        if !catalog.is_cursor_model(id) {
            return Err(SettingsError::UnknownCursorModel(id.to_string()));
        }
        let mut next = self.clone();
        if enabled {
            if !next.is_cursor_model_enabled(id) {
                next.enabled_cursor_models.push(id.to_string());
            }
        } else if id == CURSOR_AUTO {
            tracing::debug!("ignoring request to disable '{}'", CURSOR_AUTO);
        } else {
            next.enabled_cursor_models.retain(|m| m != id);
            if next.cursor_default_model == id {
                next.cursor_default_model = CURSOR_AUTO.to_string();
            }
            for (phase, model) in next.phase_models.iter_mut() {
                if model.as_str() == id {
                    *model = phase.default_model().to_string();
                }
            }
        }
        Ok(next)
    }

    pub fn with_cursor_default_model(&self, id: &str) -> Result<ModelSettings, SettingsError> {
        let id = strip_provider_prefix(id);
        if !self.is_cursor_model_enabled(id) {
            return Err(SettingsError::CursorModelNotEnabled(id.to_string()));
        }
        let mut next = self.clone();
        next.cursor_default_model = id.to_string();
        Ok(next)
    }

    /// Claude aliases followed by enabled Cursor models, in catalog order.
    pub fn phase_model_choices(&self, catalog: &ModelCatalog) -> Vec<PhaseChoice> {
        let claude = catalog.claude_aliases.iter().map(|a| PhaseChoice {
            value: a.alias.clone(),
            label: a.label.clone(),
            family: ProviderFamily::Claude,
        });
        let cursor = catalog
            .cursor_models
            .iter()
            .filter(|m| self.is_cursor_model_enabled(&m.id))
            .map(|m| PhaseChoice {
                value: m.id.clone(),
                label: m.label.clone(),
                family: ProviderFamily::Cursor,
            });
        claude.chain(cursor).collect()
    }

    pub fn with_phase_model(
        &self,
        catalog: &ModelCatalog,
        phase: Phase,
        model: &str,
    ) -> Result<ModelSettings, SettingsError> {
        let model = strip_provider_prefix(model);
        if !self
            .phase_model_choices(catalog)
            .iter()
            .any(|c| c.value == model)
        {
            return Err(SettingsError::UnavailablePhaseModel {
                phase,
                model: model.to_string(),
            });
        }
        let mut next = self.clone();
        next.phase_models.insert(phase, model.to_string());
        Ok(next)
    }

    /// Effective model for a phase: per-call override, then the phase
    /// selection, then `default_model`.
    pub fn resolve_phase(
        &self,
        resolver: &ModelResolver<'_>,
        phase: Phase,
        override_model: Option<&str>,
        default_model: Option<&str>,
    ) -> String {
        resolver.effective_model(override_model, Some(self.phase_model(phase)), default_model)
    }

    /// Effective model for a Cursor task: per-call choice, then the selected
    /// Cursor default, then the catalog's Cursor default.
    pub fn resolve_cursor(&self, resolver: &ModelResolver<'_>, explicit: Option<&str>) -> String {
        let catalog = resolver.catalog();
        resolver.effective_model(
            explicit,
            Some(self.cursor_default_model()),
            Some(catalog.default_for(ProviderFamily::Cursor)),
        )
    }
}

/// Per-item model override layered over a global selection (e.g. the model
/// used to validate a single issue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOverride {
    global: String,
    override_model: Option<String>,
}

impl ModelOverride {
    pub fn new(global: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            override_model: None,
        }
    }

    pub fn effective(&self) -> &str {
        self.override_model.as_deref().unwrap_or(&self.global)
    }

    pub fn is_overridden(&self) -> bool {
        self.override_model.is_some()
    }

    /// `None` clears the override.
    pub fn set(&self, model: Option<String>) -> ModelOverride {
        ModelOverride {
            global: self.global.clone(),
            override_model: model.filter(|m| !m.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SilentLog;

    fn catalog() -> &'static ModelCatalog {
        ModelCatalog::builtin()
    }

    #[test]
    fn defaults_enable_only_auto() {
        let s = ModelSettings::default();
        assert_eq!(s.enabled_cursor_models(), ["auto".to_string()]);
        assert_eq!(s.cursor_default_model(), "auto");
        assert_eq!(s.phase_model(Phase::SpecGeneration), "opus");
        assert_eq!(s.phase_model(Phase::FileDescription), "haiku");
    }

    #[test]
    fn toggle_returns_new_snapshot_in_insertion_order() {
        let s0 = ModelSettings::default();
        let s1 = s0.toggle_cursor_model(catalog(), "grok", true).unwrap();
        let s2 = s1.toggle_cursor_model(catalog(), "cursor-composer-1", true).unwrap();
        assert_eq!(s0.enabled_cursor_models(), ["auto".to_string()]);
        assert_eq!(
            s2.enabled_cursor_models(),
            ["auto".to_string(), "grok".to_string(), "composer-1".to_string()]
        );
        // Enabling twice does not duplicate.
        let s3 = s2.toggle_cursor_model(catalog(), "grok", true).unwrap();
        assert_eq!(s3, s2);
    }

    #[test]
    fn auto_cannot_be_disabled() {
        let s = ModelSettings::default()
            .toggle_cursor_model(catalog(), "auto", false)
            .unwrap();
        assert!(s.is_cursor_model_enabled("auto"));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let err = ModelSettings::default()
            .toggle_cursor_model(catalog(), "nope", true)
            .unwrap_err();
        assert_eq!(err, SettingsError::UnknownCursorModel("nope".into()));
    }

    #[test]
    fn disabling_default_resets_to_auto() {
        let s = ModelSettings::default()
            .toggle_cursor_model(catalog(), "gpt-5.1", true)
            .unwrap()
            .with_cursor_default_model("gpt-5.1")
            .unwrap();
        assert_eq!(s.cursor_default_model(), "gpt-5.1");
        let s = s.toggle_cursor_model(catalog(), "gpt-5.1", false).unwrap();
        assert_eq!(s.cursor_default_model(), "auto");
        assert!(!s.is_cursor_model_enabled("gpt-5.1"));
    }

    #[test]
    fn default_must_be_enabled() {
        let err = ModelSettings::default()
            .with_cursor_default_model("grok")
            .unwrap_err();
        assert_eq!(err, SettingsError::CursorModelNotEnabled("grok".into()));
    }

    #[test]
    fn phase_choices_list_claude_then_enabled_cursor() {
        let s = ModelSettings::default()
            .toggle_cursor_model(catalog(), "grok", true)
            .unwrap()
            .toggle_cursor_model(catalog(), "composer-1", true)
            .unwrap();
        let values: Vec<String> = s
            .phase_model_choices(catalog())
            .into_iter()
            .map(|c| c.value)
            .collect();
        // Cursor entries follow catalog order, not enable order.
        assert_eq!(values, ["haiku", "sonnet", "opus", "auto", "composer-1", "grok"]);
    }

    #[test]
    fn phase_model_must_be_a_choice() {
        let s = ModelSettings::default();
        let err = s
            .with_phase_model(catalog(), Phase::Validation, "grok")
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnavailablePhaseModel { .. }));

        let s = s
            .with_phase_model(catalog(), Phase::Validation, "cursor-auto")
            .unwrap();
        assert_eq!(s.phase_model(Phase::Validation), "auto");
    }

    #[test]
    fn resolve_phase_honours_override() {
        let resolver = ModelResolver::with_log(catalog(), &SilentLog);
        let s = ModelSettings::default();
        assert_eq!(
            s.resolve_phase(&resolver, Phase::Validation, None, None),
            "claude-sonnet-4-5-20250929"
        );
        assert_eq!(
            s.resolve_phase(&resolver, Phase::Validation, Some("composer-1"), None),
            "cursor-composer-1"
        );
    }

    #[test]
    fn resolve_phase_uses_given_default_for_unknown_override() {
        let resolver = ModelResolver::with_log(catalog(), &SilentLog);
        let s = ModelSettings::default();
        assert_eq!(
            s.resolve_phase(
                &resolver,
                Phase::Validation,
                Some("not-a-model"),
                Some("claude-haiku-4-5-20251001")
            ),
            "claude-haiku-4-5-20251001"
        );
    }

    #[test]
    fn disabling_model_resets_phases_using_it() {
        let s = ModelSettings::default()
            .toggle_cursor_model(catalog(), "grok", true)
            .unwrap()
            .with_phase_model(catalog(), Phase::Validation, "grok")
            .unwrap()
            .with_phase_model(catalog(), Phase::SpecGeneration, "grok")
            .unwrap();
        assert_eq!(s.phase_model(Phase::Validation), "grok");

        let s = s.toggle_cursor_model(catalog(), "grok", false).unwrap();
        assert_eq!(s.phase_model(Phase::Validation), "sonnet");
        assert_eq!(s.phase_model(Phase::SpecGeneration), "opus");
        let choices = s.phase_model_choices(catalog());
        for phase in Phase::ALL {
            assert!(choices.iter().any(|c| c.value == s.phase_model(phase)));
        }
    }

    #[test]
    fn resolve_cursor_follows_selected_default() {
        let resolver = ModelResolver::with_log(catalog(), &SilentLog);
        let s = ModelSettings::default();
        assert_eq!(s.resolve_cursor(&resolver, None), "cursor-auto");
        let s = s
            .toggle_cursor_model(catalog(), "composer-1", true)
            .unwrap()
            .with_cursor_default_model("composer-1")
            .unwrap();
        assert_eq!(s.resolve_cursor(&resolver, None), "cursor-composer-1");
        assert_eq!(s.resolve_cursor(&resolver, Some("grok")), "cursor-grok");
        // Unknown choices fall back to the catalog's cursor default.
        assert_eq!(s.resolve_cursor(&resolver, Some("nope")), "cursor-auto");
    }

    #[test]
    fn model_override_round_trip() {
        let o = ModelOverride::new("sonnet");
        assert_eq!(o.effective(), "sonnet");
        assert!(!o.is_overridden());
        let o2 = o.set(Some("opus".into()));
        assert_eq!(o2.effective(), "opus");
        assert!(o2.is_overridden());
        assert!(!o2.set(None).is_overridden());
        assert!(!o2.set(Some(String::new())).is_overridden());
    }

    #[test]
    fn phase_names_parse() {
        assert_eq!("spec_generation".parse::<Phase>().unwrap(), Phase::SpecGeneration);
        assert!("nope".parse::<Phase>().is_err());
    }
}
