use clap::{Parser, Subcommand};

use modelroute::cli_status::StatusProbe;
use modelroute::config::{ModelsCfg, load_user_config, modelroute_home};
use modelroute::logging::{home_override, init_tracing};
use modelroute::{ModelResolver, Phase, provider_for_model};

#[derive(Debug, Parser)]
#[command(name = "modelroute", version, about = "Resolve model aliases to canonical model strings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a single model key.
    Resolve {
        key: String,
        /// Fallback when the key is unknown (defaults to models.default_model).
        #[arg(long)]
        default: Option<String>,
    },
    /// Resolve the effective model: explicit > session > default.
    Effective {
        #[arg(long)]
        explicit: Option<String>,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        default: Option<String>,
        /// Resolve for a Cursor task: the selected Cursor default stands in
        /// for the session model and the catalog's Cursor default for the
        /// fallback.
        #[arg(long, conflicts_with_all = ["session", "default"])]
        cursor: bool,
    },
    /// List the model catalog and which Cursor models are enabled.
    Models {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective model for every phase.
    Phases {
        /// Per-call override applied to every phase.
        #[arg(long = "override")]
        override_model: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Probe the Cursor CLI installation and authentication.
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let home = modelroute_home(home_override());
    let user_cfg = load_user_config(&home);
    init_tracing(&home, user_cfg.as_ref().ok().and_then(|c| c.as_ref()));
    let models: ModelsCfg = user_cfg?.and_then(|c| c.models).unwrap_or_default();

    let catalog = models.catalog()?;
    let settings = models.settings(&catalog)?;
    let resolver = ModelResolver::new(&catalog);
    // A configured default may itself be an alias.
    let configured_default = models
        .default_model
        .as_deref()
        .map(|d| resolver.resolve_model_string(Some(d), None));

    match cli.command {
        Command::Resolve { key, default } => {
            let default = default.or(configured_default);
            let model = resolver.resolve_model_string(Some(&key), default.as_deref());
            println!("{}\t{}", model, provider_for_model(&model));
        }
        Command::Effective {
            explicit,
            session,
            default,
            cursor,
        } => {
            let model = if cursor {
                settings.resolve_cursor(&resolver, explicit.as_deref())
            } else {
                let default = default.or(configured_default);
                resolver.effective_model(
                    explicit.as_deref(),
                    session.as_deref(),
                    default.as_deref(),
                )
            };
            println!("{}\t{}", model, provider_for_model(&model));
        }
        Command::Models { json } => {
            if json {
                let cursor: Vec<_> = catalog
                    .cursor_models
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "model": m,
                            "enabled": settings.is_cursor_model_enabled(&m.id),
                            "default": settings.cursor_default_model() == m.id,
                        })
                    })
                    .collect();
                let out = serde_json::json!({
                    "claude": catalog.claude_aliases,
                    "cursor": cursor,
                    "enabled_cursor_models": settings.enabled_cursor_models(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for a in &catalog.claude_aliases {
                    println!("claude  {:<22} {:<30} {}", a.alias, a.model, a.label);
                }
                for m in &catalog.cursor_models {
                    let mut flags = Vec::new();
                    if settings.is_cursor_model_enabled(&m.id) {
                        flags.push("enabled");
                    }
                    if settings.cursor_default_model() == m.id {
                        flags.push("default");
                    }
                    if m.has_thinking {
                        flags.push("thinking");
                    }
                    println!(
                        "cursor  {:<22} {:<30} {:?} {}",
                        m.id,
                        m.label,
                        m.tier,
                        flags.join(",")
                    );
                }
            }
        }
        Command::Phases {
            override_model,
            json,
        } => {
            let rows: Vec<(Phase, &str, String)> = Phase::ALL
                .into_iter()
                .map(|p| {
                    let model = settings.resolve_phase(
                        &resolver,
                        p,
                        override_model.as_deref(),
                        configured_default.as_deref(),
                    );
                    (p, settings.phase_model(p), model)
                })
                .collect();
            if json {
                let out: serde_json::Map<String, serde_json::Value> = rows
                    .iter()
                    .map(|(p, selected, model)| {
                        (
                            p.to_string(),
                            serde_json::json!({ "selected": selected, "model": model }),
                        )
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (p, selected, model) in &rows {
                    println!("{:<20} {:<22} {}", p, selected, model);
                }
            }
        }
        Command::Status { json } => {
            let probe = models.status_probe();
            let status = probe.probe().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if !status.installed {
                println!("{}: not installed", probe.binary.display());
            } else {
                println!(
                    "{}: installed ({})",
                    probe.binary.display(),
                    status.version.as_deref().unwrap_or("unknown version")
                );
                match status.auth.as_ref() {
                    Some(a) if a.authenticated => println!(
                        "authenticated via {}",
                        a.method.as_deref().unwrap_or("unknown")
                    ),
                    _ => println!("not authenticated"),
                }
            }
        }
    }

    Ok(())
}
