//! specsync CLI
//!
//! Command-line interface for importing OpenAPI specifications into Postman.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use specsync::sync::SyncEvent;
use specsync::{
    Config, FailurePolicy, HttpSpecFetcher, PostmanClient, SyncReport, SyncSettings, Synchronizer,
    credentials, init, sources,
};

#[derive(Parser)]
#[command(name = "specsync")]
#[command(
    author,
    version,
    about = "Import OpenAPI/Swagger specifications into a Postman workspace"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter configuration and URL list
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Import every listed specification into the workspace
    Sync {
        /// Directory to search for the configuration (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Continue with the next specification when one fails
        #[arg(long)]
        keep_going: bool,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and URL list without calling any service
    Check {
        /// Directory to search for the configuration (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => {
            let dir = resolve_dir(path)?;

            print_header();
            println!("{}", "Initializing specsync configuration...\n".cyan());

            init::init(&dir, force)?;

            println!("\n{}", "✨ Initialization complete!".green().bold());
            println!(
                "\nNext steps:\n  1. Set {} in {}\n  2. Add specification URLs to {}\n  3. Run {}",
                "workspace_name".cyan(),
                specsync::config::CONFIG_FILE_NAME.cyan(),
                specsync::config::DEFAULT_URLS_FILE.cyan(),
                "specsync sync".cyan()
            );
        }

        Commands::Sync {
            path,
            config,
            keep_going,
            json,
        } => {
            let (config_path, config) = load_config(path, config)?;
            let urls = sources::load_source_urls(&config.urls_path(&config_path))?;
            let api_key = credentials::resolve_api_key(&config.api_key_path(&config_path))?;

            let client = PostmanClient::new(&config.api_base_url, api_key, config.timeout())?;
            let fetcher = HttpSpecFetcher::new(config.timeout())?;
            let policy = if keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::FailFast
            };
            let synchronizer =
                Synchronizer::new(&client, &fetcher, SyncSettings::from_config(&config, policy));

            if !json {
                print_header();
                println!(
                    "{} {} specification(s) into {}\n",
                    "➤ Importing".cyan().bold(),
                    urls.len(),
                    config.workspace_name.bold()
                );
            }

            let report = synchronizer.run_with(&urls, |event| {
                if !json {
                    print_event(&event);
                }
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&config, &report);
            }

            if !report.is_success() {
                bail!(
                    "{} of {} specification(s) failed to import",
                    report.failed.len(),
                    urls.len()
                );
            }
        }

        Commands::Check { path, config } => {
            let (config_path, config) = load_config(path, config)?;
            let urls_path = config.urls_path(&config_path);
            let urls = sources::load_source_urls(&urls_path)?;

            println!(
                "  {} Config: {}",
                "✔".green(),
                config_path.display().to_string().dimmed()
            );
            println!("  {} Workspace: {}", "✔".green(), config.workspace_name);
            println!(
                "  {} {} specification URL(s) in {}",
                "✔".green(),
                urls.len(),
                urls_path.display().to_string().dimmed()
            );
            for url in &urls {
                println!("    • {}", url);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_dir(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Ok(env::current_dir()?),
    }
}

fn load_config(path: Option<PathBuf>, config: Option<PathBuf>) -> Result<(PathBuf, Config)> {
    let config_path = match config {
        Some(p) => p,
        None => Config::find_config(&resolve_dir(path)?)?,
    };
    tracing::debug!(config = %config_path.display(), "loading configuration");
    let config = Config::load(&config_path)?;
    Ok((config_path, config))
}

fn print_event(event: &SyncEvent<'_>) {
    match event {
        SyncEvent::WorkspaceResolved { id, created } => {
            let action = if *created { "Created" } else { "Using" };
            println!("  {} {} workspace {}", "✔".green(), action, id.dimmed());
        }
        SyncEvent::Imported(imported) => {
            let verb = if imported.collection.replaced.is_some() {
                "Replaced"
            } else {
                "Imported"
            };
            println!(
                "  {} {} {} {}",
                "✔".green(),
                verb,
                imported.collection.name.bold(),
                format!("({})", imported.url).dimmed()
            );
        }
        SyncEvent::Failed(failed) => {
            eprintln!("  {} {}: {}", "✘".red(), failed.url, failed.error);
        }
    }
}

fn print_summary(config: &Config, report: &SyncReport) {
    if report.is_success() {
        println!("\n{}", "✨ Sync complete!".green().bold());
    } else {
        println!("\n{}", "⚠ Sync finished with failures".yellow().bold());
    }
    println!(
        "  Imported: {}, Failed: {}",
        report.imported.len().to_string().green(),
        if report.failed.is_empty() {
            report.failed.len().to_string().dimmed()
        } else {
            report.failed.len().to_string().red()
        }
    );
    println!(
        "\nWorkspace Link:\n{}",
        config.workspace_link(&report.workspace_id).cyan()
    );
}

fn print_header() {
    println!(
        "{}",
        r#"
╔═══════════════════════════════════════════════════════════════════╗
║                          specsync                                 ║
║            OpenAPI to Postman Collection Sync                     ║
╚═══════════════════════════════════════════════════════════════════╝
"#
        .cyan()
        .bold()
    );
}
