//! Resolve loosely specified model keys to canonical, provider-routable strings.
//!
//! Accepted inputs:
//! - Claude aliases (`opus`) -> full Claude model string.
//! - Full Claude strings (`claude-sonnet-4-20250514`) -> unchanged.
//! - Prefixed Cursor ids (`cursor-composer-1`) -> unchanged, known or not.
//! - Bare Cursor ids (`composer-1`) -> prefixed so routing picks the Cursor CLI.
//!
//! Anything else falls back to the caller's default, or the catalog's Claude
//! default when the caller passes none.

use crate::catalog::ModelCatalog;
use crate::provider::{CLAUDE_MARKER, CURSOR_PREFIX, ProviderFamily, add_provider_prefix};

/// Diagnostic sink for resolution decisions. Never influences results.
pub trait ResolveLog: Send + Sync {
    fn debug(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// Forwards resolver diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ResolveLog for TracingLog {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "modelroute::resolver", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "modelroute::resolver", "{}", msg);
    }
}

/// Drops all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentLog;

impl ResolveLog for SilentLog {
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
}

/// Borrowed view over a catalog plus a log sink. Cheap to copy around.
#[derive(Clone, Copy)]
pub struct ModelResolver<'a> {
    catalog: &'a ModelCatalog,
    log: &'a dyn ResolveLog,
}

static TRACING_LOG: TracingLog = TracingLog;

impl<'a> ModelResolver<'a> {
    /// Resolver over `catalog` that logs through `tracing`.
    pub fn new(catalog: &'a ModelCatalog) -> Self {
        Self {
            catalog,
            log: &TRACING_LOG,
        }
    }

    pub fn with_log(catalog: &'a ModelCatalog, log: &'a dyn ResolveLog) -> Self {
        Self { catalog, log }
    }

    pub fn catalog(&self) -> &'a ModelCatalog {
        self.catalog
    }

    /// Map a model key to a full model string. Total: never fails, never
    /// returns an empty string.
    pub fn resolve_model_string(
        &self,
        model_key: Option<&str>,
        default_model: Option<&str>,
    ) -> String {
        let default_model = self.fallback(default_model);

        let Some(key) = model_key.filter(|k| !k.is_empty()) else {
            self.log.debug(&format!(
                "no model specified, using default: {}",
                default_model
            ));
            return default_model.to_string();
        };

        if let Some(id) = key.strip_prefix(CURSOR_PREFIX) {
            if self.catalog.is_cursor_model(id) {
                self.log
                    .debug(&format!("using cursor model: {} (id: {})", key, id));
            } else {
                self.log.debug(&format!(
                    "passing through unrecognised cursor-prefixed model: {}",
                    key
                ));
            }
            return key.to_string();
        }

        if self.catalog.is_cursor_model(key) {
            let prefixed = add_provider_prefix(ProviderFamily::Cursor, key);
            self.log
                .debug(&format!("bare cursor model id '{}' -> '{}'", key, prefixed));
            return prefixed;
        }

        if key.contains(CLAUDE_MARKER) {
            self.log
                .debug(&format!("using full claude model string: {}", key));
            return key.to_string();
        }

        if let Some(resolved) = self.catalog.claude_alias(key).filter(|m| !m.is_empty()) {
            self.log
                .debug(&format!("claude alias '{}' -> '{}'", key, resolved));
            return resolved.to_string();
        }

        self.log.warn(&format!(
            "unknown model key '{}', using default: '{}'",
            key, default_model
        ));
        default_model.to_string()
    }

    /// Three-tier override chain: explicit > session > default.
    pub fn effective_model(
        &self,
        explicit_model: Option<&str>,
        session_model: Option<&str>,
        default_model: Option<&str>,
    ) -> String {
        let key = explicit_model
            .filter(|m| !m.is_empty())
            .or(session_model.filter(|m| !m.is_empty()));
        self.resolve_model_string(key, default_model)
    }

    fn fallback<'d>(&self, default_model: Option<&'d str>) -> &'d str
    where
        'a: 'd,
    {
        match default_model.filter(|d| !d.is_empty()) {
            Some(d) => d,
            None => self.catalog.default_for(ProviderFamily::Claude),
        }
    }
}

/// Resolve against the built-in catalog, logging through `tracing`.
pub fn resolve_model_string(model_key: Option<&str>, default_model: Option<&str>) -> String {
    ModelResolver::new(ModelCatalog::builtin()).resolve_model_string(model_key, default_model)
}

/// Effective model against the built-in catalog.
pub fn get_effective_model(
    explicit_model: Option<&str>,
    session_model: Option<&str>,
    default_model: Option<&str>,
) -> String {
    ModelResolver::new(ModelCatalog::builtin()).effective_model(
        explicit_model,
        session_model,
        default_model,
    )
}
