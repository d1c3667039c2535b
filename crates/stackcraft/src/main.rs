//! Stackcraft CLI - Cloud resource discovery and guarded cleanup

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use stackcraft_core::tui::CleanupArgs;
use stackcraft_core::{CleanupPlan, ProductConfig, ProjectInventory, ResourceDiscoverer};
use std::path::PathBuf;

/// Stackcraft product configuration
#[derive(Clone)]
pub struct StackcraftConfig;

impl ProductConfig for StackcraftConfig {
    fn display_name(&self) -> &'static str {
        "Stackcraft"
    }

    fn project_dir_env(&self) -> &'static str {
        "STACKCRAFT_PROJECT_DIR"
    }

    fn docs_url(&self) -> &'static str {
        "https://stackcraft.dev/docs"
    }
}

#[derive(Parser, Debug)]
#[command(name = "stackcraft")]
#[command(about = "Discover and clean up the cloud resources of a scaffolded project")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the cloud resources a project is wired to
    Discover(DiscoverArgs),
    /// Select resources to delete and approve a cleanup plan
    Cleanup(CliCleanupArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InventoryFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
pub struct DiscoverArgs {
    /// Project directory to inspect (default: $STACKCRAFT_PROJECT_DIR, then cwd)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = InventoryFormat::Text)]
    pub format: InventoryFormat,
}

#[derive(Parser, Debug)]
pub struct CliCleanupArgs {
    /// Project directory to inspect (default: $STACKCRAFT_PROJECT_DIR, then cwd)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Write the approved plan to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Plan output format
    #[arg(short, long, value_enum, default_value_t = PlanFormat::Json)]
    pub format: PlanFormat,
}

impl From<&CliCleanupArgs> for CleanupArgs {
    fn from(args: &CliCleanupArgs) -> Self {
        CleanupArgs {
            directory: args.directory.clone(),
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn discover(config: &StackcraftConfig, args: DiscoverArgs) -> Result<()> {
    let project_dir = config.project_dir(args.directory.as_deref());
    let inventory = ResourceDiscoverer::new(config.file_layout())
        .discover(&project_dir)
        .await?;

    match args.format {
        InventoryFormat::Text => print_inventory(&inventory),
        InventoryFormat::Json => println!("{}", serde_json::to_string_pretty(&inventory)?),
        InventoryFormat::Yaml => print!("{}", serde_yaml::to_string(&inventory)?),
    }

    Ok(())
}

fn print_inventory(inventory: &ProjectInventory) {
    println!(
        "{} {}",
        inventory.project_name.bold(),
        format!("({})", inventory.project_path).dimmed()
    );
    println!();

    if inventory.available_types().is_empty() {
        println!("{}", "No cloud resources found".yellow());
        return;
    }

    for line in inventory.summary_lines() {
        if line.starts_with("  ") {
            println!("  {}", line.dimmed());
        } else {
            println!("  {} {}", "•".cyan(), line);
        }
    }
}

fn render_plan(plan: &CleanupPlan, format: PlanFormat) -> Result<String> {
    let rendered = match format {
        PlanFormat::Json => serde_json::to_string_pretty(plan)? + "\n",
        PlanFormat::Yaml => serde_yaml::to_string(plan)?,
    };
    Ok(rendered)
}

async fn cleanup(config: &StackcraftConfig, args: CliCleanupArgs) -> Result<bool> {
    let Some(plan) = stackcraft_core::run_cleanup(config, CleanupArgs::from(&args)).await? else {
        return Ok(false);
    };

    let rendered = render_plan(&plan, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            eprintln!("{} {}", "Plan written to".green(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_logging();

    let args = Args::parse();
    let config = StackcraftConfig;

    match args.command {
        Some(Command::Cleanup(cleanup_args)) => {
            let result = cleanup(&config, cleanup_args).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            // An aborted gate is not an error, but scripts must not see success
            if !result? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Discover(discover_args)) => discover(&config, discover_args).await,
        None => {
            // No subcommand provided, default to listing the current project
            discover(
                &config,
                DiscoverArgs {
                    directory: None,
                    format: InventoryFormat::Text,
                },
            )
            .await
        }
    }
}
