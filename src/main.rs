//! buildplan CLI - monorepo build planner for CI
//!
//! Usage: buildplan <COMMAND>
//!
//! Commands:
//!   plan         Compute the build plan and write all artifacts
//!   classify     Preview the build plan without writing anything
//!   fingerprint  Print the content fingerprint for one service

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use buildplan::config::{Config, Overrides};

/// buildplan - monorepo build planner for CI
#[derive(Parser, Debug)]
#[command(name = "buildplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration inputs shared by every command.
///
/// Each flag falls back to its environment variable, then to a default
/// under the workspace root.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Workspace root (GITHUB_WORKSPACE)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Service build list output file (SERVICES_OUTPUT_PATH)
    #[arg(long)]
    services_output: Option<PathBuf>,

    /// Package build list output file (PACKAGES_OUTPUT_PATH)
    #[arg(long)]
    packages_output: Option<PathBuf>,

    /// Service retag list output file (SERVICES_RETAG_OUTPUT_PATH)
    #[arg(long)]
    retag_output: Option<PathBuf>,

    /// Directory enumerated to form the service registry (HELM_SERVICES_FOLDER)
    #[arg(long)]
    services_dir: Option<PathBuf>,

    /// Root of package/service sources (PACKAGES_FOLDER)
    #[arg(long)]
    packages_dir: Option<PathBuf>,

    /// Comma-separated changed file paths (CHANGED_FILES_PR / CHANGED_FILES_NOT_PR)
    #[arg(long)]
    changed_files: Option<String>,

    /// Comma-separated changed folder names, replacing the list derived
    /// from the changed files (CHANGED_FOLDERS)
    #[arg(long)]
    changed_folders: Option<String>,
}

impl From<ConfigArgs> for Overrides {
    fn from(args: ConfigArgs) -> Self {
        Overrides {
            root: args.root,
            services_output: args.services_output,
            packages_output: args.packages_output,
            retag_output: args.retag_output,
            services_dir: args.services_dir,
            packages_dir: args.packages_dir,
            changed_files: args.changed_files,
            changed_folders: args.changed_folders,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the build plan, write fingerprints and all list artifacts
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Compute and print the build plan without writing anything
    Classify {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the content fingerprint for one service (debugging)
    Fingerprint {
        /// Service name to fingerprint
        service: String,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { config } => cmd_plan(config, cli.json),
        Commands::Classify { config } => cmd_classify(config, cli.json),
        Commands::Fingerprint { service, config } => cmd_fingerprint(&service, config, cli.json),
    }
}

/// Changed folders for the run: the explicit override when present,
/// otherwise derived from the changed-file list.
fn resolve_changed(config: &Config) -> Result<Vec<String>> {
    match &config.changed_folders {
        Some(folders) => Ok(folders.clone()),
        None => Ok(buildplan::changed_folders(config.changed_files.as_deref())?),
    }
}

fn print_config(config: &Config) {
    println!("Root: {}", config.root.display());
    println!("Services dir: {}", config.services_dir.display());
    println!("Packages dir: {}", config.packages_dir.display());
    println!("Service list: {}", config.services_output.display());
    println!("Package list: {}", config.packages_output.display());
    println!("Retag list: {}", config.retag_output.display());
    if let Some(changed) = &config.changed_files {
        println!("Changed files: {}", changed);
    }
}

fn cmd_plan(args: ConfigArgs, json: bool) -> Result<()> {
    let config = Config::resolve(args.into())?;

    if !json {
        println!("📦 Buildplan Plan");
        print_config(&config);
        println!();
    }

    let registry = buildplan::services(&config.services_dir)?;
    let changed = resolve_changed(&config)?;
    if !json {
        println!("Changed folders: {:?}", changed);
    }

    let (build_map, packages) = buildplan::classify(&changed, &registry, &config.packages_dir)?;
    let plan = buildplan::assemble(&registry, build_map, packages);

    buildplan::write_fingerprints(&plan.services, &config)?;
    buildplan::write_artifacts(&plan, &config)?;

    if json {
        let output = serde_json::json!({
            "event": "plan",
            "build": plan.services.keys().collect::<Vec<_>>(),
            "packages": plan.packages,
            "retag": plan.retag,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        println!(
            "Summary: {} to build, {} to retag, {} packages implicated",
            plan.services.len(),
            plan.retag.len(),
            plan.packages.len()
        );
    }

    Ok(())
}

fn cmd_classify(args: ConfigArgs, json: bool) -> Result<()> {
    let config = Config::resolve(args.into())?;

    if !json {
        println!("🔍 Buildplan Classify (preview, nothing written)");
        print_config(&config);
        println!();
    }

    let registry = buildplan::services(&config.services_dir)?;
    let changed = resolve_changed(&config)?;
    let (build_map, packages) = buildplan::classify(&changed, &registry, &config.packages_dir)?;
    let plan = buildplan::assemble(&registry, build_map, packages);

    if json {
        println!("{}", serde_json::to_string(&plan)?);
    } else {
        println!("Build ({}):", plan.services.len());
        for (service, reasons) in &plan.services {
            println!("  {} <- {:?}", service, reasons);
        }
        println!("Packages ({}):", plan.packages.len());
        for package in &plan.packages {
            println!("  {}", package);
        }
        println!("Retag ({}):", plan.retag.len());
        for service in &plan.retag {
            println!("  {}", service);
        }
    }

    Ok(())
}

fn cmd_fingerprint(service: &str, args: ConfigArgs, json: bool) -> Result<()> {
    let config = Config::resolve(args.into())?;

    let reasons = vec![service.to_string()];
    let value = buildplan::fingerprint(service, &reasons, &config.packages_dir)?;

    if json {
        let output = serde_json::json!({
            "event": "fingerprint",
            "service": service,
            "fingerprint": value,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", value);
    }

    Ok(())
}
