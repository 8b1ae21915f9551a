//! Tracing setup: env flags first, `[logging]` config as fallback.

use std::path::{Path, PathBuf};

use env_flags::env_flags;
use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LoggingCfg, UserConfig};

env_flags! {
    /// Tracing filter, e.g. "info", "debug", or targets format.
    RUST_LOG: &str = "info";
    /// Preferred filter env (alias). If set, overrides RUST_LOG.
    TRACING_FILTER: &str = "";
    /// Pretty formatting for logs (ignored if TRACING_JSON=true).
    TRACING_PRETTY: bool = false;
    /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
    TRACING_COMPACT: bool = true;
    /// JSON formatting for logs
    TRACING_JSON: bool = false;
    /// If true, also log to file under <MODELROUTE_HOME>/logs or LOG_DIR
    LOG_TO_FILE: bool = false;
    /// Optional explicit log directory (absolute). Defaults to <MODELROUTE_HOME>/logs
    LOG_DIR: &str = "";
    /// modelroute home directory (absolute). Defaults to $HOME/.modelroute
    MODELROUTE_HOME: &str = "";
}

/// Explicit home override from the environment (empty when unset).
pub fn home_override() -> &'static str {
    &MODELROUTE_HOME
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Json,
    Compact,
    Pretty,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
    pub compact: bool,
    pub pretty: bool,
    pub to_file: bool,
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let filter = if !(*TRACING_FILTER).is_empty() {
            (*TRACING_FILTER).to_string()
        } else {
            (*RUST_LOG).to_string()
        };
        Self {
            filter,
            json: *TRACING_JSON,
            compact: *TRACING_COMPACT,
            pretty: *TRACING_PRETTY,
            to_file: *LOG_TO_FILE,
            dir: if !(*LOG_DIR).is_empty() {
                Some(PathBuf::from((*LOG_DIR).to_string()))
            } else {
                None
            },
        }
    }

    /// Fill values whose env var is unset from the config file.
    pub fn apply_config(mut self, cfg: &LoggingCfg, env_set: impl Fn(&str) -> bool) -> Self {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            self.filter = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            self.json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            self.compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            self.pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            self.to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            self.dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn style(&self) -> LogStyle {
        if self.json {
            LogStyle::Json
        } else if self.compact {
            LogStyle::Compact
        } else if self.pretty {
            LogStyle::Pretty
        } else {
            LogStyle::Full
        }
    }
}

type Base = Layered<EnvFilter, Registry>;

fn format_layer<W>(style: LogStyle, ansi: bool, writer: W) -> Box<dyn Layer<Base> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match style {
        LogStyle::Json => base.json().boxed(),
        LogStyle::Compact => base.compact().boxed(),
        LogStyle::Pretty => base.pretty().boxed(),
        LogStyle::Full => base.boxed(),
    }
}

/// Install the global subscriber. Logs always go to stderr so stdout stays
/// parseable; a daily rolling file is added when enabled.
pub fn init_tracing(home: &Path, user_cfg: Option<&UserConfig>) {
    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

    let env_set = |k: &str| std::env::var_os(k).is_some();
    let mut settings = LogSettings::from_env();
    if let Some(cfg) = user_cfg.and_then(|c| c.logging.as_ref()) {
        settings = settings.apply_config(cfg, env_set);
    }

    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let style = settings.style();

    let mut layers = vec![format_layer(style, true, std::io::stderr)];
    let mut dir_error = None;
    if settings.to_file {
        let dir = settings.dir.clone().unwrap_or_else(|| home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "modelroute.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                layers.push(format_layer(style, false, nb));
            }
            Err(e) => dir_error = Some((dir, e)),
        }
    }

    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = dir_error {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}
