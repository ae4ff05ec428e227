//! policyweaver CLI
//!
//! Reads a policy export, translates it into Fabric OneLake data access
//! roles and publishes them to the configured lakehouse.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use policyweaver_clients::{FabricClient, GraphClient};
use policyweaver_core::prelude::*;
use policyweaver_model::PolicyExport;
use tracing::{error, info};

mod config;
mod logging;

use config::Config;

#[derive(Parser)]
#[command(
    name = "policyweaver",
    about = "Publish catalog access policies as Fabric OneLake data access roles"
)]
struct Cli {
    /// Source map / run configuration (YAML)
    #[arg(long, default_value = "config.yaml", env = "PW_CONFIG")]
    config: PathBuf,

    /// Policy export document (JSON)
    #[arg(long)]
    export: PathBuf,

    /// Resolve and build the policies, print the payload, publish nothing
    #[arg(long)]
    dry_run: bool,

    /// Maximum concurrent identity lookups (overrides config)
    #[arg(long)]
    max_concurrency: Option<usize>,
}

fn read_export(path: &Path) -> anyhow::Result<PolicyExport> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading policy export {}", path.display()))?;
    PolicyExport::from_json(&contents)
        .with_context(|| format!("parsing policy export {}", path.display()))
}

async fn weave(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let export = read_export(&cli.export)?;

    let mut source = config.source;
    if let Some(limit) = cli.max_concurrency {
        source.max_concurrent_lookups = limit;
    }

    let identities = GraphClient::from_config(&source.service_principal)
        .context("creating Graph client")?;
    let platform = FabricClient::from_config(&source.fabric).context("creating Fabric client")?;
    let weaver = Weaver::new(source, Arc::new(identities), Arc::new(platform));

    if cli.dry_run {
        let plan = weaver.plan(&export).await?;
        info!(
            policies = plan.policies.len(),
            lakehouse_id = %plan.target.lakehouse_id,
            "Dry run, nothing published"
        );
        println!("{}", serde_json::to_string_pretty(&plan.request())?);
        return Ok(());
    }

    let report = weaver.run(&export).await?;
    println!("Access policies updated: {}", report.policies_published);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {}: {e}", cli.config.display());
            return ExitCode::from(2);
        }
    };

    logging::init(&config.logging);

    match weave(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            // Run failures (resolution, publish) vs. bad input/configuration
            if e.downcast_ref::<WeaverError>().is_some() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "policyweaver",
            "--config",
            "pw.yaml",
            "--export",
            "export.json",
            "--dry-run",
            "--max-concurrency",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("pw.yaml"));
        assert_eq!(cli.export, PathBuf::from("export.json"));
        assert!(cli.dry_run);
        assert_eq!(cli.max_concurrency, Some(2));
    }

    #[test]
    fn test_export_required() {
        assert!(Cli::try_parse_from(["policyweaver"]).is_err());
    }

    #[test]
    fn test_read_export_reports_path() {
        let path = std::env::temp_dir().join("policyweaver_bad_export.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_export(&path).unwrap_err();
        assert!(format!("{err:#}").contains("policyweaver_bad_export.json"));
        assert!(err.downcast_ref::<WeaverError>().is_none());

        std::fs::remove_file(path).ok();
    }
}
