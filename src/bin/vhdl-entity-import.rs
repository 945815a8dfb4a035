//! Command-line front end for the entity importer.
//!
//! Reads a VHDL file, optionally edits generic values and deselects
//! declarations, then prints the resulting interface.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vhdl_entity_import::{interface_report, EntityImporter, ImportConfig, LogSink};

#[derive(Parser)]
#[command(name = "vhdl-entity-import")]
#[command(about = "Extract the generics and ports of a VHDL entity")]
#[command(version)]
struct Args {
    /// VHDL source file
    file: PathBuf,

    /// JSON file with importer options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a generic value, as NAME=VALUE
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Deselect the declaration that introduces NAME
    #[arg(long, value_name = "NAME")]
    disable: Vec<String>,

    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else if args.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ImportConfig::from_file(path)?,
        None => ImportConfig::default(),
    };

    let mut importer = EntityImporter::new(config);
    let mut sink = LogSink;
    let summary = importer.load_file(&args.file, &mut sink)?;
    if let Some(reason) = &summary.rejected {
        tracing::warn!("{}: {}", args.file.display(), reason);
    }

    for assignment in &args.set {
        let (name, value) = assignment
            .split_once('=')
            .context(format!("Expected NAME=VALUE, got '{}'", assignment))?;
        let Some(generic) = importer.generic_by_name(name.trim()) else {
            bail!("No generic named '{}'", name.trim());
        };
        let id = generic.id;
        let touched = importer.set_generic_value(id, value.trim())?;
        tracing::info!(
            "{} = {}: re-evaluated {} ports and {} generics",
            name.trim(),
            value.trim(),
            touched.ports.len(),
            touched.generics.len()
        );
    }

    for name in &args.disable {
        let Some(span) = importer.span_of(name) else {
            bail!("No generic or port named '{}'", name);
        };
        importer.on_selection_toggled(span, false, &mut sink)?;
    }

    if args.json {
        let output = serde_json::json!({
            "entity": summary.entity,
            "generics": importer.generics(),
            "ports": importer.ports(),
            "dependencies": importer.graph().edge_count(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", interface_report(&importer));
    }

    Ok(())
}
