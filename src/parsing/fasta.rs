//! Parser for germline FASTA files using noodles.
//!
//! Extracts segment identifiers and validated sequences.
//! Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;

use crate::core::nucleotide::NucleotideSequence;
use crate::parsing::ParseError;
use crate::utils::validation::check_segment_limit;

/// How segment identifiers are taken from FASTA definition lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FastaHeaderStyle {
    /// The record name (definition line up to the first whitespace)
    #[default]
    Plain,
    /// IMGT/GENE-DB style: pipe-delimited, allele name in the second field;
    /// IMGT gap characters (`.`) are removed from the sequence
    Imgt,
}

/// A germline sequence read from FASTA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: NucleotideSequence,
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Parse a germline FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found, a header
/// has no identifier, or a sequence contains invalid symbols, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_fasta_file(
    path: &Path,
    style: FastaHeaderStyle,
) -> Result<Vec<FastaRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let mut reader = fasta::io::Reader::new(BufReader::new(GzDecoder::new(file)));
        parse_fasta_reader(&mut reader, style)
    } else {
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        parse_fasta_reader(&mut reader, style)
    }
}

/// Parse germline FASTA from text
///
/// # Errors
///
/// See [`parse_fasta_file`].
pub fn parse_fasta_text(
    text: &str,
    style: FastaHeaderStyle,
) -> Result<Vec<FastaRecord>, ParseError> {
    let mut reader = fasta::io::Reader::new(text.as_bytes());
    parse_fasta_reader(&mut reader, style)
}

/// Parse from a noodles FASTA reader
fn parse_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
    style: FastaHeaderStyle,
) -> Result<Vec<FastaRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        // Check record limit for DOS protection
        if let Some(message) = check_segment_limit(records.len()) {
            return Err(ParseError::TooManyRecords(message));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        let description = record
            .description()
            .map(|d| String::from_utf8_lossy(d).to_string());

        let (id, description) = match style {
            FastaHeaderStyle::Plain => (name, description),
            FastaHeaderStyle::Imgt => {
                let id = imgt_allele_name(&name).ok_or_else(|| {
                    ParseError::InvalidFormat(format!(
                        "FASTA header '{name}' is not pipe-delimited IMGT style"
                    ))
                })?;
                let full_header = match description {
                    Some(d) => format!("{name} {d}"),
                    None => name.clone(),
                };
                (id, Some(full_header))
            }
        };

        let raw = record.sequence().as_ref();
        let parsed = match style {
            FastaHeaderStyle::Plain => NucleotideSequence::from_bytes(raw),
            FastaHeaderStyle::Imgt => {
                let ungapped: Vec<u8> = raw.iter().copied().filter(|&b| b != b'.').collect();
                NucleotideSequence::from_bytes(&ungapped)
            }
        };
        let sequence = parsed.map_err(|e| {
            ParseError::InvalidFormat(format!("Invalid sequence for '{id}': {e}"))
        })?;

        records.push(FastaRecord {
            id,
            description,
            sequence,
        });
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(records)
}

/// Extract the allele name from the second field of an IMGT header
fn imgt_allele_name(name: &str) -> Option<String> {
    name.split('|')
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
