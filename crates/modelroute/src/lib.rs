//! Resolve model aliases and provider ids to canonical, routable model strings.

pub mod catalog;
pub mod cli_status;
pub mod config;
pub mod logging;
pub mod provider;
pub mod resolver;
pub mod settings;

pub use catalog::ModelCatalog;
pub use provider::{ProviderFamily, provider_for_model, strip_provider_prefix};
pub use resolver::{ModelResolver, ResolveLog, get_effective_model, resolve_model_string};
pub use settings::{ModelOverride, ModelSettings, Phase};
