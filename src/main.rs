//! KB-Linkcheck main entry point
//!
//! This is the command-line interface for the KB-Linkcheck link auditor.

use anyhow::Context;
use clap::Parser;
use kb_linkcheck::config::{load_config_with_hash, Config};
use kb_linkcheck::crawler::crawl;
use kb_linkcheck::input::{discover_inputs, read_identifiers, InputSource};
use kb_linkcheck::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// KB-Linkcheck: a knowledge-base hyperlink auditor
///
/// KB-Linkcheck opens every listed knowledge-base article, harvests its
/// hyperlinks, follows attachment links into the embedded document viewer,
/// and records the reachability of every link in a CSV ledger.
#[derive(Parser, Debug)]
#[command(name = "kb-linkcheck")]
#[command(version = "1.0.0")]
#[command(about = "A knowledge-base hyperlink auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// CSV file of article identifiers, or a directory of such files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and inputs and show what would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let inputs = discover_inputs(&cli.input, &config.output)
        .with_context(|| format!("Failed to resolve input {}", cli.input.display()))?;

    if cli.dry_run {
        handle_dry_run(&config, &inputs)
    } else {
        handle_crawl(config, &inputs).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_linkcheck=info,warn"),
            1 => EnvFilter::new("kb_linkcheck=debug,info"),
            2 => EnvFilter::new("kb_linkcheck=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates inputs and lists the articles
fn handle_dry_run(config: &Config, inputs: &[InputSource]) -> anyhow::Result<()> {
    println!("=== KB-Linkcheck Dry Run ===\n");

    println!("Portal:");
    println!("  Article URL: {}", config.portal.article_url);
    println!("  Content selector: {}", config.portal.content_selector);
    println!("  Login patterns: {}", config.portal.login_patterns.join(", "));
    if let Some(env) = &config.portal.cookie_env {
        println!("  Session cookie from: ${}", env);
    }

    println!("\nViewer:");
    println!("  Attachment marker: {}", config.viewer.url_marker);
    println!("  Container selector: {}", config.viewer.container_selector);
    println!("  Text layer selector: {}", config.viewer.text_layer_selector);

    println!("\nTimeouts:");
    println!("  Navigation: {}s", config.timeouts.navigation);
    println!("  Content wait: {}s", config.timeouts.content_wait);
    println!("  Link probe: {}s", config.timeouts.probe);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    let mut total = 0;
    for input in inputs {
        let identifiers = read_identifiers(&input.path)
            .with_context(|| format!("Failed to read {}", input.path.display()))?;

        println!(
            "\nInput {} -> {} ({} identifiers):",
            input.path.display(),
            input.output_path.display(),
            identifiers.len()
        );
        for identifier in &identifiers {
            println!("  * {}", config.portal.article_url_for(identifier));
        }
        total += identifiers.len();
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would audit {} articles", total);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, inputs: &[InputSource]) -> anyhow::Result<()> {
    tracing::info!("Starting audit of {} input file(s)", inputs.len());

    match crawl(config, inputs).await {
        Ok(stats) => {
            tracing::info!("Audit completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            Err(e.into())
        }
    }
}
