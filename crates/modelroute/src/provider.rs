//! Provider families and prefix helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reserved prefix routing a model string to the Cursor CLI.
pub const CURSOR_PREFIX: &str = "cursor-";

/// Substring marking a full Claude model string (e.g. `claude-sonnet-4-20250514`).
pub const CLAUDE_MARKER: &str = "claude-";

/// Supported provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Claude,
    Cursor,
}

impl ProviderFamily {
    pub const ALL: [ProviderFamily; 2] = [ProviderFamily::Claude, ProviderFamily::Cursor];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderFamily::Claude => "claude",
            ProviderFamily::Cursor => "cursor",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Ok(ProviderFamily::Claude),
            "cursor" => Ok(ProviderFamily::Cursor),
            other => Err(anyhow::anyhow!("unknown provider family '{}'", other)),
        }
    }
}

/// Get the routing prefix for a provider family, if it uses one.
pub fn prefix_for(family: ProviderFamily) -> Option<&'static str> {
    match family {
        ProviderFamily::Claude => None,
        ProviderFamily::Cursor => Some(CURSOR_PREFIX),
    }
}

/// Remove a known provider prefix; inputs without one are returned as-is.
pub fn strip_provider_prefix(model: &str) -> &str {
    for family in ProviderFamily::ALL {
        if let Some(prefix) = prefix_for(family)
            && let Some(rest) = model.strip_prefix(prefix)
        {
            return rest;
        }
    }
    model
}

/// Compose `<prefix><id>` for the family, leaving already-prefixed ids alone.
pub fn add_provider_prefix(family: ProviderFamily, id: &str) -> String {
    match prefix_for(family) {
        Some(prefix) if !id.starts_with(prefix) => format!("{}{}", prefix, id),
        _ => id.to_string(),
    }
}

/// Pick the execution path for an already-resolved model string.
pub fn provider_for_model(canonical: &str) -> ProviderFamily {
    if canonical.starts_with(CURSOR_PREFIX) {
        ProviderFamily::Cursor
    } else {
        ProviderFamily::Claude
    }
}
