//! # germline-resolver
//!
//! A library for resolving immune receptor germline gene segments to the
//! full nucleotide sequence they contribute to a rearranged receptor.
//!
//! V(D)J recombination opens a hairpin at each coding end before the
//! segments are joined. Asymmetric opening leaves a short palindromic
//! extension, the P-nucleotides, which are the reverse complement of the
//! bases adjacent to the boundary. Downstream alignment and annotation
//! tools need the germline sequence *including* these extensions.
//!
//! `germline-resolver` loads a validated germline library once (from FASTA
//! plus junction annotations, or from a library JSON file) and answers
//! identifier lookups with a cached, immutable full sequence.
//!
//! ## Features
//!
//! - **Deterministic derivation**: P-nucleotides are computed from the library, never stored
//! - **Load-time validation**: Malformed records are rejected before any lookup
//! - **Checked absence**: Unknown identifiers are an error, never an empty sequence
//! - **Thread-safe caching**: Each sequence is derived at most once and shared
//!
//! ## Example
//!
//! ```rust
//! use germline_resolver::{
//!     GeneType, GermlineLibrary, GermlineResolver, GermlineSegment, GermlineSequenceProvider,
//!     JunctionSide, PJunction,
//! };
//!
//! let segment = GermlineSegment::new("IGHV1-2*02", GeneType::V, "ACGTACGT".parse().unwrap())
//!     .with_junction(PJunction::new(JunctionSide::ThreePrime, 8, 2));
//! let library = GermlineLibrary::from_segments(vec![segment]).unwrap();
//!
//! let resolver = GermlineResolver::new(library);
//! let full = resolver.full_sequence_with_p("IGHV1-2*02").unwrap();
//! assert_eq!(full.to_string(), "ACGTACGTAC");
//!
//! assert!(resolver.full_sequence_with_p("IGHV9-99*01").is_err());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Nucleotide, segment, and junction types
//! - [`library`]: Germline library storage, validation, and building
//! - [`parsing`]: Parsers for FASTA and junction annotation files
//! - [`resolver`]: Cached identifier to full-sequence resolution
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod library;
pub mod parsing;
pub mod resolver;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::nucleotide::{Nucleotide, NucleotideSequence};
pub use crate::core::segment::{GermlineSegment, PJunction};
pub use crate::core::types::*;
pub use library::store::{GermlineLibrary, LibraryError};
pub use resolver::engine::GermlineResolver;
pub use resolver::{GermlineSequenceProvider, ResolveError};
