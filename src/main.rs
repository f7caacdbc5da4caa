//! Markwell - a markdown ingest pipeline and terminal viewer.
//!
//! # Usage
//!
//! ```bash
//! markwell README.md
//! markwell --watch README.md
//! markwell --check README.md
//! markwell --fix --html out.html README.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use markwell::app::{App, Model};
use markwell::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markwell::render::Strategy;
use markwell::{ast, export, lint, pipeline};

/// A markdown ingest pipeline and terminal viewer
#[derive(Parser, Debug)]
#[command(name = "markwell", version, about, long_about = None)]
struct Cli {
    /// Markdown file to view
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watch file for changes and auto-reload
    #[arg(short, long)]
    watch: bool,

    /// Run the repair cycle before rendering
    #[arg(short, long)]
    fix: bool,

    /// Lint only: print diagnostics and exit nonzero when any remain
    #[arg(long)]
    check: bool,

    /// Export the document model as HTML to a file and exit
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Dump the document state JSON to a file and exit
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Print the parsed syntax tree and exit
    #[arg(long)]
    ast: bool,

    /// Page materialization strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Root nodes per page
    #[arg(long, value_name = "N")]
    nodes_per_page: Option<usize>,

    /// Save current command-line flags as defaults in .markwellrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .markwellrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    if !Model::is_markdown_path(&cli.file) {
        anyhow::bail!(
            "Not a markdown file: {} (expected .md, .markdown, .mdown or .mkd)",
            cli.file.display()
        );
    }

    if cli.check || cli.ast || cli.html.is_some() || cli.json.is_some() {
        return run_headless(&cli, effective.fix);
    }

    let mut app = App::new(cli.file)
        .with_watch(effective.watch)
        .with_fix(effective.fix)
        .with_strategy(effective.strategy.unwrap_or_default())
        .with_nodes_per_page(
            effective
                .nodes_per_page
                .unwrap_or(markwell::model::DEFAULT_NODES_PER_PAGE),
        );

    app.run().context("Application error")
}

/// Non-interactive modes: lint, tree dump, HTML and JSON export.
fn run_headless(cli: &Cli, fix: bool) -> Result<()> {
    let mut source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let diagnostics = if fix {
        let (repaired, residual) = pipeline::repair_cycle(&source, pipeline::DEFAULT_REPAIR_PASSES);
        source = repaired;
        residual
    } else {
        let tree = ast::parse(&source)?;
        lint::lint(&source, &tree)
    };

    if cli.ast {
        let tree = ast::parse(&source)?;
        println!("{tree:#?}");
    }

    if cli.html.is_some() || cli.json.is_some() {
        let tree = ast::parse(&source)?;
        let state = markwell::model::DocumentState {
            root: markwell::model::build(&tree),
        };
        if let Some(path) = &cli.json {
            let json = state.to_json()?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        if let Some(path) = &cli.html {
            let html = export::render_html(&state.root);
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    if cli.check {
        for diagnostic in &diagnostics {
            println!("{}: {diagnostic}", cli.file.display());
        }
        if !diagnostics.is_empty() {
            std::process::exit(1);
        }
    }

    Ok(())
}
