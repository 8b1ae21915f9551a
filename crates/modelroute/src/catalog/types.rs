use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::provider::ProviderFamily;

/// Static model tables consulted by the resolver. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    /// Claude alias -> canonical model string, in presentation order.
    pub claude_aliases: Vec<ClaudeAlias>,
    /// Known Cursor model ids (bare, without prefix), in presentation order.
    pub cursor_models: Vec<CursorModelConfig>,
    /// Fallback canonical model per provider family.
    pub default_models: HashMap<ProviderFamily, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaudeAlias {
    pub alias: String,
    pub model: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Free,
    Pro,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorModelConfig {
    pub id: String,
    pub label: String,
    pub description: String,
    pub has_thinking: bool,
    pub tier: ModelTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogFile {
    #[serde(default)]
    pub claude_aliases: Vec<RawClaudeAlias>,
    #[serde(default)]
    pub cursor_models: Vec<RawCursorModel>,
    #[serde(default)]
    pub defaults: Option<HashMap<String, String>>, // family name -> model
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClaudeAlias {
    pub alias: String,
    pub model: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCursorModel {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_thinking: bool,
    #[serde(default)]
    pub tier: Option<ModelTier>,
}

impl ModelCatalog {
    /// Exact, case-sensitive Claude alias lookup.
    pub fn claude_alias(&self, alias: &str) -> Option<&str> {
        self.claude_aliases
            .iter()
            .find(|a| a.alias == alias)
            .map(|a| a.model.as_str())
    }

    /// Look up a Cursor model by its bare id.
    pub fn cursor_model(&self, id: &str) -> Option<&CursorModelConfig> {
        self.cursor_models.iter().find(|m| m.id == id)
    }

    pub fn is_cursor_model(&self, id: &str) -> bool {
        self.cursor_model(id).is_some()
    }

    /// Configured default for a family; falls back to the built-in constant
    /// when the table has no usable entry. Never empty.
    pub fn default_for(&self, family: ProviderFamily) -> &str {
        match self.default_models.get(&family).filter(|m| !m.is_empty()) {
            Some(m) => m.as_str(),
            None => match family {
                ProviderFamily::Claude => super::default::DEFAULT_CLAUDE_MODEL,
                ProviderFamily::Cursor => super::default::DEFAULT_CURSOR_MODEL,
            },
        }
    }
}
