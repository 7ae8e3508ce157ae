//! rNGSI-Adapter - NGSI adapter parsers for Monasca and Nagios telemetry
//!
//! This binary runs one parser plugin over a request body read from a file
//! or stdin and prints the resulting NGSI context update.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::info;

use rngsi_adapter::cli::{Cli, OutputFormat};
use rngsi_adapter::config::NameMapping;
use rngsi_adapter::parser::{ContextUpdate, ParserKind};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    rngsi_adapter::init_logging(&cli.log_level.to_string())?;

    if cli.list_parsers {
        for kind in ParserKind::ALL {
            println!("{}", kind);
        }
        return Ok(());
    }

    if cli.validate {
        let mapping = match &cli.mapping {
            Some(path) => NameMapping::load(path)?,
            None => NameMapping::default(),
        };
        println!("Mapping is valid ({} entries)", mapping.len());
        return Ok(());
    }

    let Some(name) = cli.parser.as_deref() else {
        bail!("no parser given, use --parser <NAME> (see --list-parsers)");
    };
    let kind: ParserKind = name.parse().map_err(|e: String| anyhow!(e))?;

    // Load the mapping table
    let mapping = match &cli.mapping {
        Some(path) => NameMapping::load_or_default(path)?,
        None => NameMapping::default(),
    };

    let body = read_body(cli.input.as_deref())?;
    info!(parser = %kind, bytes = body.len(), "Parsing request body");

    let update = kind.process(&body, &mapping)?;

    match cli.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&update)?),
        OutputFormat::Text => print_text(&update),
    }

    Ok(())
}

/// Read the request body from a file or stdin
fn read_body(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read stdin")?;
            Ok(body)
        }
    }
}

/// Human-readable rendering of a context update
fn print_text(update: &ContextUpdate) {
    if let Some(entity) = &update.entity {
        println!("entityType: {}", entity.entity_type);
        println!("entityId:   {}", entity.entity_id);
    }
    println!("attributes:");
    for (name, value) in &update.attrs {
        println!("  {} = {}", name, value);
    }
}
