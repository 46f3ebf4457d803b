//! Parsers for loading germline reference data.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: Germline segment sequences, plain or IMGT-style headers
//! - **Junction annotation TSV files**: Recombination boundaries and P-nucleotide counts
//!
//! ## Example
//!
//! ```rust,no_run
//! use germline_resolver::parsing::annotations::parse_annotation_file;
//! use germline_resolver::parsing::fasta::{parse_fasta_file, FastaHeaderStyle};
//! use std::path::Path;
//!
//! let records = parse_fasta_file(Path::new("IGHV.fasta"), FastaHeaderStyle::Imgt).unwrap();
//! let annotations = parse_annotation_file(Path::new("junctions.tsv")).unwrap();
//! ```
//!
//! ## Annotation Columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | 1 | Segment identifier | Yes |
//! | 2 | Gene type (V, D, J, C) or `.` to infer from the name | Yes |
//! | 3 | 5' junction position | No |
//! | 4 | 5' P-nucleotide count | No |
//! | 5 | 3' junction position | No |
//! | 6 | 3' P-nucleotide count | No |
//! | 7 | 5' palindrome content | No |
//! | 8 | 3' palindrome content | No |

use thiserror::Error;

pub mod annotations;
pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("{0}")]
    TooManyRecords(String),
}
