//! NARS console
//!
//! Launches one reasoning backend and wires the terminal to it:
//! - lines typed on stdin are sent to the backend as-is
//! - every backend output line is printed to stdout
//! - `/do <name>` tells the backend the agent performed an operation; `name`
//!   is looked up in the `--alias` table first
//! - `/stats` prints the agent counters as JSON, `/quit` (or Ctrl-C) exits

use anyhow::{Context, Result};
use clap::Parser;
use nars_agent::{Agent, AgentConfig};
use nars_bridge::BackendConfig;
use nars_core::{BackendType, Operation, OperationAliases};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nars-console", version, about = "Interactive console for NARS backends")]
struct Args {
    /// Backend family: opennars, ona, ona_old or python
    #[arg(long, default_value = "opennars")]
    backend: BackendType,

    /// Directory holding the backend executable
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Executable file name, overriding the family default
    #[arg(long)]
    executable: Option<PathBuf>,

    /// Inference steps requested per update, overriding the family default
    #[arg(long)]
    cadence: Option<u32>,

    /// JSON file with goals and sense/operation gates
    #[arg(long)]
    agent_config: Option<PathBuf>,

    /// Operation shortcut for `/do`, as `alias=operation` (repeatable)
    #[arg(long = "alias", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_alias(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((alias, operation)) if !alias.is_empty() && !operation.is_empty() => {
            Ok((alias.to_string(), operation.to_string()))
        }
        _ => Err(format!("expected alias=operation, got {s:?}")),
    }
}

/// Operation named by a `/do` argument
fn resolve_operation(aliases: &OperationAliases, name: &str) -> Operation {
    aliases
        .resolve(name)
        .cloned()
        .unwrap_or_else(|| Operation::new(name))
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let agent_config = match &args.agent_config {
        Some(path) => AgentConfig::from_json_file(path)
            .with_context(|| format!("loading agent config {}", path.display()))?,
        None => AgentConfig::default(),
    };

    let mut backend_config = BackendConfig::new(args.backend, args.root.clone());
    backend_config.executable = args.executable.clone();
    backend_config.inference_cadence = args.cadence;

    info!(
        "NARS console starting ({} at {})",
        args.backend,
        backend_config.executable_path().display()
    );

    let aliases = OperationAliases::from_pairs(
        args.aliases
            .iter()
            .map(|(alias, operation)| (alias.as_str(), operation.as_str())),
    );
    if !aliases.is_empty() {
        info!("{} operation alias(es) loaded", aliases.len());
    }

    let mut agent = Agent::new(agent_config);
    let dialect = args.backend.dialect();
    agent.set_output_observer(move |line| {
        println!("{line}");
        if let Some(name) = dialect.extract(line) {
            info!("Backend executed ^{}", name);
        }
    });

    agent
        .equip(&backend_config)
        .await
        .with_context(|| format!("launching {}", backend_config.launch_command()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                let line = line.trim();
                match line {
                    "" => continue,
                    "/quit" => break,
                    "/stats" => println!("{}", serde_json::to_string_pretty(&agent.stats())?),
                    command if command.starts_with("/do ") => {
                        let operation = resolve_operation(&aliases, command[4..].trim());
                        if let Err(e) = agent.force_unconscious_operation(&operation, true) {
                            warn!("Backend is gone: {}", e);
                            break;
                        }
                        info!("Performed {}", operation);
                    }
                    input => {
                        if let Err(e) = agent.add_input(input) {
                            warn!("Backend is gone: {}", e);
                            break;
                        }
                    }
                }
            }
        }
    }

    agent.disconnect();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias() {
        assert_eq!(
            parse_alias("a=left").unwrap(),
            ("a".to_string(), "left".to_string())
        );
        assert_eq!(
            parse_alias("fire=^shoot").unwrap(),
            ("fire".to_string(), "^shoot".to_string())
        );
        assert!(parse_alias("left").is_err());
        assert!(parse_alias("=left").is_err());
        assert!(parse_alias("a=").is_err());
    }

    #[test]
    fn test_resolve_operation_prefers_alias() {
        let aliases = OperationAliases::from_pairs([("a", "left"), ("d", "right")]);
        assert_eq!(resolve_operation(&aliases, "a"), Operation::new("left"));
        assert_eq!(resolve_operation(&aliases, "^jump"), Operation::new("jump"));
    }

    #[test]
    fn test_alias_flags() {
        let args = Args::try_parse_from([
            "nars-console",
            "--backend",
            "ONA",
            "--alias",
            "a=left",
            "--alias",
            "d=right",
        ])
        .unwrap();
        assert_eq!(args.backend, BackendType::Ona);
        assert_eq!(args.aliases.len(), 2);
        assert!(Args::try_parse_from(["nars-console", "--alias", "bad"]).is_err());
    }
}
