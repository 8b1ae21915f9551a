use std::collections::HashMap;

use super::types::{ClaudeAlias, CursorModelConfig, ModelTier};
use crate::provider::ProviderFamily;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-opus-4-5-20251101";
pub const DEFAULT_CURSOR_MODEL: &str = "cursor-auto";

/// Bare id of the Cursor model that is always enabled.
pub const CURSOR_AUTO: &str = "auto";

pub fn default_claude_aliases() -> Vec<ClaudeAlias> {
    [
        ("haiku", "claude-haiku-4-5-20251001", "Claude Haiku"),
        ("sonnet", "claude-sonnet-4-5-20250929", "Claude Sonnet"),
        ("opus", "claude-opus-4-5-20251101", "Claude Opus"),
    ]
    .into_iter()
    .map(|(alias, model, label)| ClaudeAlias {
        alias: alias.to_string(),
        model: model.to_string(),
        label: label.to_string(),
    })
    .collect()
}

pub fn default_cursor_models() -> Vec<CursorModelConfig> {
    let mk = |id: &str, label: &str, description: &str, has_thinking: bool, tier: ModelTier| {
        CursorModelConfig {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            has_thinking,
            tier,
        }
    };

    vec![
        mk(
            "auto",
            "Auto (Recommended)",
            "Automatically selects the best model for each task",
            false,
            ModelTier::Free,
        ),
        mk(
            "composer-1",
            "Composer 1",
            "Cursor Composer agent model optimized for multi-file edits",
            false,
            ModelTier::Pro,
        ),
        mk(
            "sonnet-4.5",
            "Claude Sonnet 4.5",
            "Anthropic Claude Sonnet 4.5 via Cursor",
            false,
            ModelTier::Pro,
        ),
        mk(
            "sonnet-4.5-thinking",
            "Claude Sonnet 4.5 (Thinking)",
            "Claude Sonnet 4.5 with extended thinking enabled",
            true,
            ModelTier::Pro,
        ),
        mk(
            "opus-4.5",
            "Claude Opus 4.5",
            "Anthropic Claude Opus 4.5 via Cursor",
            false,
            ModelTier::Pro,
        ),
        mk(
            "opus-4.5-thinking",
            "Claude Opus 4.5 (Thinking)",
            "Claude Opus 4.5 with extended thinking enabled",
            true,
            ModelTier::Pro,
        ),
        mk(
            "opus-4.1",
            "Claude Opus 4.1",
            "Anthropic Claude Opus 4.1 via Cursor",
            false,
            ModelTier::Pro,
        ),
        mk(
            "gemini-3-pro",
            "Gemini 3 Pro",
            "Google Gemini 3 Pro via Cursor",
            false,
            ModelTier::Pro,
        ),
        mk(
            "gpt-5.1",
            "GPT-5.1",
            "OpenAI GPT-5.1 via Cursor",
            false,
            ModelTier::Pro,
        ),
        mk(
            "gpt-5.1-high",
            "GPT-5.1 High",
            "GPT-5.1 with high reasoning effort",
            true,
            ModelTier::Pro,
        ),
        mk(
            "gpt-5.1-codex",
            "GPT-5.1 Codex",
            "OpenAI GPT-5.1 Codex for code generation",
            false,
            ModelTier::Pro,
        ),
        mk(
            "grok",
            "Grok",
            "xAI Grok via Cursor",
            false,
            ModelTier::Pro,
        ),
    ]
}

pub fn default_models() -> HashMap<ProviderFamily, String> {
    let mut m = HashMap::new();
    m.insert(ProviderFamily::Claude, DEFAULT_CLAUDE_MODEL.to_string());
    m.insert(ProviderFamily::Cursor, DEFAULT_CURSOR_MODEL.to_string());
    m
}
