//! Command-line interface for germline-resolver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Print full sequences (with P-nucleotides) for segment identifiers
//! - **library**: Build, list, or show germline libraries
//!
//! ## Usage
//!
//! ```text
//! # Build a library from IMGT FASTA and junction annotations
//! germline-resolver library build --fasta IGH.fasta --header-style imgt \
//!     --annotations IGH_junctions.tsv --output human_igh.json
//!
//! # Resolve segments
//! germline-resolver resolve --library human_igh.json IGHV1-2*02 IGHJ4*02
//!
//! # FASTA output for downstream tools
//! germline-resolver resolve --library human_igh.json IGHV1-2*02 --format fasta
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::library::builder::{LibraryBuilder, LoaderConfig};
use crate::library::store::GermlineLibrary;
use crate::parsing::fasta::FastaHeaderStyle;

pub mod library;
pub mod resolve;

#[derive(Parser)]
#[command(name = "germline-resolver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Resolve germline V/D/J/C segments to full sequences with P-nucleotides")]
#[command(
    long_about = "germline-resolver looks up germline gene segments by identifier and returns their full sequence as it appears in a rearranged receptor.\n\nP-nucleotides (palindromic extensions) are derived at each annotated recombination boundary as the reverse complement of the adjacent bases."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve segment identifiers to full sequences
    Resolve(resolve::ResolveArgs),

    /// Manage germline libraries
    Library(library::LibraryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
    Fasta,
}

/// Where to load the germline library from
#[derive(clap::Args, Debug)]
pub struct LibrarySource {
    /// Germline library JSON file
    #[arg(long, required_unless_present = "fasta", conflicts_with = "fasta")]
    pub library: Option<PathBuf>,

    /// Germline FASTA file(s); can be specified multiple times
    #[arg(long)]
    pub fasta: Vec<PathBuf>,

    /// Junction annotation TSV file(s) for the FASTA sequences
    #[arg(long, requires = "fasta")]
    pub annotations: Vec<PathBuf>,

    /// FASTA header style
    #[arg(long, value_enum, default_value = "plain")]
    pub header_style: FastaHeaderStyle,

    /// P-nucleotides at default boundaries of unannotated segments
    #[arg(long, default_value = "0")]
    pub default_p_length: usize,

    /// Fail if any FASTA sequence has no junction annotation
    #[arg(long)]
    pub require_annotations: bool,
}

impl LibrarySource {
    /// Load and validate the library
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be read or the reference data is malformed.
    pub fn load(&self) -> anyhow::Result<GermlineLibrary> {
        if let Some(path) = &self.library {
            return Ok(GermlineLibrary::load_from_file(path)?);
        }

        let config = LoaderConfig {
            header_style: self.header_style,
            default_p_length: self.default_p_length,
            require_annotations: self.require_annotations,
        };

        let mut builder = LibraryBuilder::new(config);
        for path in &self.fasta {
            builder.add_fasta(path)?;
        }
        for path in &self.annotations {
            builder.add_annotations(path)?;
        }
        Ok(builder.build()?)
    }
}
