//! Germline sequence resolution.
//!
//! This module provides the lookup surface consumers query:
//!
//! - [`GermlineSequenceProvider`]: The single-method contract, identifier in,
//!   full sequence with P-nucleotides out
//! - [`GermlineResolver`]: The library-backed implementation
//!
//! ## Semantics
//!
//! - Resolution is a pure function of the identifier: the same identifier
//!   always yields the same sequence, and the returned value is shared and
//!   immutable.
//! - Unknown identifiers fail with [`ResolveError::NotFound`]; there is no
//!   empty or partial result.
//! - P-extended sequences are derived on first access and cached per
//!   segment. Concurrent first lookups may derive redundantly but all callers
//!   observe the single cached value.
//!
//! ## Example
//!
//! ```rust,no_run
//! use germline_resolver::{GermlineLibrary, GermlineResolver, GermlineSequenceProvider};
//! use std::path::Path;
//!
//! let library = GermlineLibrary::load_from_file(Path::new("human_igh.json")).unwrap();
//! let resolver = GermlineResolver::new(library);
//!
//! let full = resolver.full_sequence_with_p("IGHV1-2*02").unwrap();
//! println!("{full}");
//! ```
//!
//! [`GermlineResolver`]: engine::GermlineResolver

use std::sync::Arc;

use thiserror::Error;

use crate::core::nucleotide::NucleotideSequence;
use crate::core::segment::SegmentError;
use crate::core::types::SegmentId;

pub mod engine;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Segment '{0}' not found in germline library")]
    NotFound(String),

    /// Derivation failed for a segment the library accepted on load.
    ///
    /// Not produced for libraries built through `GermlineLibrary::from_segments`,
    /// which validates every segment before any lookup.
    #[error("Malformed reference for segment '{id}': {source}")]
    MalformedReference {
        id: SegmentId,
        #[source]
        source: SegmentError,
    },
}

/// Retrieves the full germline sequence of a segment, including P-nucleotides
pub trait GermlineSequenceProvider {
    /// Resolve `id` to its full sequence with P-nucleotide extension.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` if no segment has this identifier.
    fn full_sequence_with_p(&self, id: &str) -> Result<Arc<NucleotideSequence>, ResolveError>;
}

impl<T: GermlineSequenceProvider + ?Sized> GermlineSequenceProvider for Arc<T> {
    fn full_sequence_with_p(&self, id: &str) -> Result<Arc<NucleotideSequence>, ResolveError> {
        (**self).full_sequence_with_p(id)
    }
}

impl<T: GermlineSequenceProvider + ?Sized> GermlineSequenceProvider for &T {
    fn full_sequence_with_p(&self, id: &str) -> Result<Arc<NucleotideSequence>, ResolveError> {
        (**self).full_sequence_with_p(id)
    }
}
