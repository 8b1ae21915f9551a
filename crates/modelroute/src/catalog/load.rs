use anyhow::{Context as _, bail};
use once_cell::sync::Lazy;

use super::default::{default_claude_aliases, default_cursor_models, default_models};
use super::{ClaudeAlias, CursorModelConfig, ModelCatalog, ModelTier, RawCatalogFile};
use crate::provider::{
    CURSOR_PREFIX, ProviderFamily, add_provider_prefix, strip_provider_prefix,
};

static BUILTIN: Lazy<ModelCatalog> = Lazy::new(load_default);

impl ModelCatalog {
    /// Process-wide built-in tables.
    pub fn builtin() -> &'static ModelCatalog {
        &BUILTIN
    }
}

/// Parse a catalog override file and merge it over the built-in tables.
pub fn from_toml_str(s: &str) -> anyhow::Result<ModelCatalog> {
    let raw: RawCatalogFile = toml::from_str(s).context("invalid model catalog TOML")?;
    merge_catalog(load_default(), raw)
}

pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<ModelCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model catalog {}", path.display()))?;
    from_toml_str(&content).with_context(|| format!("in {}", path.display()))
}

pub fn load_default() -> ModelCatalog {
    ModelCatalog {
        claude_aliases: default_claude_aliases(),
        cursor_models: default_cursor_models(),
        default_models: default_models(),
    }
}

fn merge_catalog(mut catalog: ModelCatalog, raw: RawCatalogFile) -> anyhow::Result<ModelCatalog> {
    for e in raw.claude_aliases {
        if e.alias.is_empty() || e.model.is_empty() {
            bail!("claude alias entries need a non-empty alias and model");
        }
        if e.alias.starts_with(CURSOR_PREFIX) {
            bail!(
                "claude alias '{}' carries the cursor prefix and would never be reached",
                e.alias
            );
        }
        if e.model.starts_with(CURSOR_PREFIX) {
            bail!(
                "claude alias '{}' maps to '{}', which carries the cursor prefix",
                e.alias,
                e.model
            );
        }
        let entry = ClaudeAlias {
            label: e.label.unwrap_or_else(|| e.alias.clone()),
            alias: e.alias,
            model: e.model,
        };
        match catalog
            .claude_aliases
            .iter_mut()
            .find(|a| a.alias == entry.alias)
        {
            Some(existing) => *existing = entry,
            None => catalog.claude_aliases.push(entry),
        }
    }

    for e in raw.cursor_models {
        // Ids are stored bare; accept either form in the file.
        let id = strip_provider_prefix(&e.id).to_string();
        if id.is_empty() {
            bail!("cursor model entries need a non-empty id");
        }
        let entry = CursorModelConfig {
            label: e.label.unwrap_or_else(|| id.clone()),
            description: e.description.unwrap_or_default(),
            has_thinking: e.has_thinking,
            tier: e.tier.unwrap_or(ModelTier::Pro),
            id,
        };
        match catalog
            .cursor_models
            .iter_mut()
            .find(|m| m.id == entry.id)
        {
            Some(existing) => *existing = entry,
            None => catalog.cursor_models.push(entry),
        }
    }

    if let Some(defaults) = raw.defaults {
        for (family, model) in defaults {
            let family: ProviderFamily = family.parse()?;
            if model.is_empty() {
                bail!("default model for '{}' must not be empty", family);
            }
            let model = match family {
                ProviderFamily::Cursor => add_provider_prefix(family, &model),
                ProviderFamily::Claude if model.starts_with(CURSOR_PREFIX) => {
                    bail!("claude default '{}' carries the cursor prefix", model)
                }
                ProviderFamily::Claude => model,
            };
            catalog.default_models.insert(family, model);
        }
    }

    for a in &catalog.claude_aliases {
        if catalog.is_cursor_model(&a.alias) {
            tracing::warn!(
                "claude alias '{}' is shadowed by a cursor model id of the same name",
                a.alias
            );
        }
    }

    Ok(catalog)
}
