//! Contract Renderer CLI
//!
//! # Usage
//!
//! ```bash
//! # Render next to the template as <stem>_rendered.py
//! render-contract library/wallet/contracts/template/wallet.py
//!
//! # Stamp headers with git revisions and print the JSON report
//! render-contract wallet.py --use-git --full-filepath-in-headers --report
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use contract_renderer::{RenderConfig, RenderConfigBuilder, Renderer};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "render-contract")]
#[command(about = "Render a contract template and its feature modules into one file", long_about = None)]
struct Cli {
    /// Template module to render
    template: PathBuf,

    /// Output file (default: <stem>_rendered.py next to the template)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML renderer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra root for resolving feature modules (repeatable)
    #[arg(long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Stamp module headers with the last commit touching each module
    #[arg(long)]
    use_git: bool,

    /// Git repository root (discovered from the template when omitted)
    #[arg(long)]
    git_repo_root: Option<PathBuf>,

    /// Show module paths relative to the repository in headers
    #[arg(long)]
    full_filepath_in_headers: bool,

    /// Skip the layout normalisation pass
    #[arg(long)]
    no_formatting: bool,

    /// Keep metadata where the template declares it
    #[arg(long)]
    no_metadata_reorder: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Print the render report as JSON on stdout
    #[arg(long)]
    report: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_path_for(&cli.template));

    let renderer = Renderer::new(config);
    let output = renderer
        .render(&cli.template)
        .with_context(|| format!("failed to render {}", cli.template.display()))?;
    output
        .render_to_file(&output_path, cli.force)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    if cli.report {
        let json = serde_json::to_string_pretty(&output.report).context("serializing report")?;
        println!("{json}");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// YAML file (or defaults), then command line overrides
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let base = match &cli.config {
        Some(path) => RenderConfig::from_yaml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let mut builder = RenderConfigBuilder::from_config(base);
    for path in &cli.search_paths {
        builder = builder.search_path(path.clone());
    }
    if cli.use_git {
        builder = builder.use_git(true);
    }
    if let Some(root) = &cli.git_repo_root {
        builder = builder.git_repo_root(root.clone());
    }
    if cli.full_filepath_in_headers {
        builder = builder.use_full_filepath_in_headers(true);
    }
    if cli.no_formatting {
        builder = builder.apply_formatting(false);
    }
    if cli.no_metadata_reorder {
        builder = builder.render_metadata_at_top_of_file(false);
    }
    builder.build().context("invalid renderer configuration")
}
