use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{LibrarySource, OutputFormat};
use crate::core::types::GeneType;
use crate::resolver::engine::GermlineResolver;
use crate::resolver::ResolveError;

#[derive(Args)]
pub struct ResolveArgs {
    /// Segment identifiers to resolve (e.g. "IGHV1-2*02")
    #[arg(required_unless_present = "ids_file")]
    pub ids: Vec<String>,

    /// File with one segment identifier per line
    #[arg(long)]
    pub ids_file: Option<PathBuf>,

    #[command(flatten)]
    pub source: LibrarySource,
}

/// A resolved segment, as reported to the user
#[derive(Debug, Serialize)]
struct ResolvedSegment {
    id: String,
    gene_type: GeneType,
    base_length: usize,
    p_length: usize,
    sequence: String,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if the library cannot be loaded, or if any identifier is
/// not in the library (after printing the ones that are).
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let library = args.source.load()?;

    if verbose {
        eprintln!(
            "Loaded {} segments (signature {})",
            library.len(),
            library.signature().unwrap_or("-")
        );
    }

    let resolver = GermlineResolver::new(library);
    let ids = collect_ids(&args)?;

    let mut resolved = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();

    for id in ids {
        match resolver.resolve(&id) {
            Ok(sequence) => {
                // Present whenever resolve succeeds
                if let Some(segment) = resolver.segment(&id) {
                    resolved.push(ResolvedSegment {
                        id,
                        gene_type: segment.gene_type,
                        base_length: segment.sequence.len(),
                        p_length: segment.p_length(),
                        sequence: sequence.to_string(),
                    });
                }
            }
            Err(ResolveError::NotFound(id)) => missing.push(id),
            Err(e) => return Err(e.into()),
        }
    }

    match format {
        OutputFormat::Text => print_text(&resolved),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Tsv => print_tsv(&resolved),
        OutputFormat::Fasta => print_fasta(&resolved),
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "{} segment(s) not found in germline library: {}",
            missing.len(),
            missing.join(", ")
        );
    }

    Ok(())
}

fn collect_ids(args: &ResolveArgs) -> anyhow::Result<Vec<String>> {
    let mut ids = args.ids.clone();
    if let Some(path) = &args.ids_file {
        let content = std::fs::read_to_string(path)?;
        ids.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    Ok(ids)
}

fn print_text(resolved: &[ResolvedSegment]) {
    for segment in resolved {
        println!(
            "{} ({}, {} nt + {} P)",
            segment.id, segment.gene_type, segment.base_length, segment.p_length
        );
        println!("{}", segment.sequence);
    }
}

fn print_tsv(resolved: &[ResolvedSegment]) {
    println!("id\tgene_type\tbase_length\tp_length\tsequence");
    for segment in resolved {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            segment.id, segment.gene_type, segment.base_length, segment.p_length, segment.sequence
        );
    }
}

fn print_fasta(resolved: &[ResolvedSegment]) {
    for segment in resolved {
        println!(">{}\n{}", segment.id, segment.sequence);
    }
}
