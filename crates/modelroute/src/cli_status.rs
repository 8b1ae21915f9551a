//! Installation and authentication status of a provider CLI.
//!
//! Probing never fails: a binary that cannot be spawned, times out or exits
//! non-zero is reported as not installed.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub const DEFAULT_CURSOR_BINARY: &str = "cursor-agent";
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);
pub const CURSOR_API_KEY_ENV: &str = "CURSOR_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliStatus {
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl CliStatus {
    pub fn is_authenticated(&self) -> bool {
        self.auth.as_ref().is_some_and(|a| a.authenticated)
    }
}

#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn probe(&self) -> CliStatus;
}

/// Probes the Cursor agent CLI by running `--version` and `status`.
#[derive(Debug, Clone)]
pub struct CursorCliProbe {
    pub binary: PathBuf,
    pub timeout: Duration,
    /// Value of the API key env var; read once at construction.
    pub api_key: Option<String>,
}

impl CursorCliProbe {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            api_key: std::env::var(CURSOR_API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty()),
        }
    }

    async fn run(&self, arg: &str) -> Option<String> {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.arg(arg)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                tracing::debug!("{} {}: spawn failed: {}", self.binary.display(), arg, e);
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    "{} {}: timed out after {:?}",
                    self.binary.display(),
                    arg,
                    self.timeout
                );
                return None;
            }
        };
        if !output.status.success() {
            tracing::debug!(
                "{} {}: exited with {}",
                self.binary.display(),
                arg,
                output.status
            );
            return None;
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Some(text)
    }

    fn auth_from(&self, status_output: Option<&str>) -> AuthStatus {
        if status_output.is_some_and(reports_logged_in) {
            return AuthStatus {
                authenticated: true,
                method: Some("login".to_string()),
            };
        }
        if self.api_key.is_some() {
            return AuthStatus {
                authenticated: true,
                method: Some("api_key".to_string()),
            };
        }
        AuthStatus {
            authenticated: false,
            method: None,
        }
    }
}

impl Default for CursorCliProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_BINARY, DEFAULT_STATUS_TIMEOUT)
    }
}

#[async_trait]
impl StatusProbe for CursorCliProbe {
    async fn probe(&self) -> CliStatus {
        let Some(version_out) = self.run("--version").await else {
            return CliStatus::default();
        };
        let version = parse_version(&version_out);
        let status_out = self.run("status").await;
        let auth = self.auth_from(status_out.as_deref());
        tracing::info!(
            "{}: installed (version={}, authenticated={})",
            self.binary.display(),
            version.as_deref().unwrap_or("unknown"),
            auth.authenticated
        );
        CliStatus {
            installed: true,
            version,
            auth: Some(auth),
        }
    }
}

/// First non-empty line of `--version` output.
fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn reports_logged_in(output: &str) -> bool {
    let lower = output.to_ascii_lowercase();
    lower.contains("logged in") && !lower.contains("not logged in")
}
