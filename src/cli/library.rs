use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::cli::{LibrarySource, OutputFormat};
use crate::core::segment::GermlineSegment;
use crate::core::types::{GeneType, JunctionSide};
use crate::library::store::GermlineLibrary;

#[derive(Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommands,
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    /// Build a library JSON from FASTA and junction annotations
    Build {
        #[command(flatten)]
        source: LibrarySource,

        /// Output file path
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// List all segments in the library
    List {
        #[command(flatten)]
        source: LibrarySource,

        /// Filter by gene type (V, D, J, C)
        #[arg(long, value_enum, ignore_case = true)]
        gene_type: Option<GeneType>,
    },

    /// Show details of a specific segment
    Show {
        /// Segment identifier
        #[arg(required = true)]
        id: String,

        #[command(flatten)]
        source: LibrarySource,
    },
}

/// Execute library subcommand
///
/// # Errors
///
/// Returns an error if the library cannot be loaded or written, or the
/// requested segment does not exist.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LibraryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        LibraryCommands::Build {
            source,
            output,
            force,
        } => run_build(&source, &output, force, verbose),
        LibraryCommands::List { source, gene_type } => {
            let library = source.load()?;
            list_segments(&library, gene_type, format)
        }
        LibraryCommands::Show { id, source } => {
            let library = source.load()?;
            show_segment(&library, &id, format)
        }
    }
}

fn run_build(
    source: &LibrarySource,
    output: &Path,
    force: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Output file {} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let library = source.load()?;
    std::fs::write(output, library.to_json()?)?;

    if verbose {
        eprintln!(
            "Wrote {} segments to {} (signature {})",
            library.len(),
            output.display(),
            library.signature().unwrap_or("-")
        );
    }

    Ok(())
}

fn junction_summary(segment: &GermlineSegment, side: JunctionSide) -> String {
    segment
        .junction(side)
        .map_or_else(|| ".".to_string(), |j| format!("{}:{}", j.position, j.length))
}

fn list_segments(
    library: &GermlineLibrary,
    gene_type: Option<GeneType>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let segments: Vec<&GermlineSegment> = library
        .segments()
        .iter()
        .filter(|s| gene_type.map_or(true, |g| s.gene_type == g))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("{:<24} {:<4} {:>8} {:>8} {:>8}", "ID", "TYPE", "LENGTH", "5' P", "3' P");
            println!("{}", "-".repeat(56));
            for segment in &segments {
                println!(
                    "{:<24} {:<4} {:>8} {:>8} {:>8}",
                    segment.id,
                    segment.gene_type,
                    segment.sequence.len(),
                    junction_summary(segment, JunctionSide::FivePrime),
                    junction_summary(segment, JunctionSide::ThreePrime),
                );
            }
            println!("\nTotal: {} segments", segments.len());
            if let Some(signature) = library.signature() {
                println!("Library signature: {signature}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        OutputFormat::Tsv => {
            println!("id\tgene_type\tlength\tfive_prime\tthree_prime");
            for segment in &segments {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    segment.id,
                    segment.gene_type,
                    segment.sequence.len(),
                    junction_summary(segment, JunctionSide::FivePrime),
                    junction_summary(segment, JunctionSide::ThreePrime),
                );
            }
        }
        OutputFormat::Fasta => {
            for segment in &segments {
                println!(">{}\n{}", segment.id, segment.sequence);
            }
        }
    }

    Ok(())
}

fn show_segment(library: &GermlineLibrary, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let segment = library
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Segment '{id}' not found in germline library"))?;
    let full = segment.full_sequence_with_p()?;

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("ID:          {}", segment.id);
            println!("Gene type:   {}", segment.gene_type);
            if let Some(description) = &segment.description {
                println!("Description: {description}");
            }
            println!("Length:      {} nt", segment.sequence.len());
            println!("MD5:         {}", segment.sequence.md5());
            if let Some(signature) = library.signature() {
                println!("Library:     {signature}");
            }
            for junction in &segment.junctions {
                let palindrome = junction.derive_palindrome(&segment.sequence)?;
                println!(
                    "{} junction: position {}, {} P-nucleotides ({})",
                    junction.side, junction.position, junction.length, palindrome
                );
            }
            println!("\nBase sequence:\n{}", segment.sequence);
            println!("\nFull sequence with P ({} nt):\n{}", full.len(), full);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "segment": segment,
                "md5": segment.sequence.md5(),
                "full_sequence": full.to_string(),
                "full_length": full.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Fasta => {
            println!(">{}\n{}", segment.id, full);
        }
    }

    Ok(())
}
