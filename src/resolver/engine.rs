use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::core::nucleotide::NucleotideSequence;
use crate::core::segment::GermlineSegment;
use crate::library::store::GermlineLibrary;
use crate::resolver::{GermlineSequenceProvider, ResolveError};

/// Resolves segment identifiers against a germline library.
///
/// Owns its library; construct it once and hand it (or an `Arc` of it) to
/// every consumer. Safe to share between threads without external locking.
#[derive(Debug)]
pub struct GermlineResolver {
    library: GermlineLibrary,

    /// Derived full sequences, one slot per library segment
    cache: Vec<OnceLock<Arc<NucleotideSequence>>>,
}

impl GermlineResolver {
    #[must_use]
    pub fn new(library: GermlineLibrary) -> Self {
        let cache = (0..library.len()).map(|_| OnceLock::new()).collect();
        Self { library, cache }
    }

    /// Resolve a segment identifier to its full sequence with P-nucleotides
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` if the identifier is not in the library.
    pub fn resolve(&self, id: &str) -> Result<Arc<NucleotideSequence>, ResolveError> {
        let index = self
            .library
            .index_of(id)
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))?;
        self.resolve_index(index)
    }

    fn resolve_index(&self, index: usize) -> Result<Arc<NucleotideSequence>, ResolveError> {
        let slot = &self.cache[index];
        if let Some(cached) = slot.get() {
            return Ok(Arc::clone(cached));
        }

        // Derive outside the cell so errors propagate; a racing thread may
        // derive the same value, but only the first one is stored
        let segment = &self.library.segments()[index];
        let derived = segment
            .full_sequence_with_p()
            .map_err(|source| ResolveError::MalformedReference {
                id: segment.id.clone(),
                source,
            })?;

        Ok(Arc::clone(slot.get_or_init(|| Arc::new(derived))))
    }

    /// Base record for a segment
    #[must_use]
    pub fn segment(&self, id: &str) -> Option<&GermlineSegment> {
        self.library.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.library.contains(id)
    }

    /// Derive every full sequence up front, returning how many were newly computed
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MalformedReference` if a segment cannot be derived.
    pub fn warm(&self) -> Result<usize, ResolveError> {
        let before = self.cached_len();
        for index in 0..self.cache.len() {
            self.resolve_index(index)?;
        }
        let computed = self.cached_len() - before;
        debug!(computed, total = self.cache.len(), "Warmed germline resolver cache");
        Ok(computed)
    }

    /// Number of segments whose full sequence has been derived
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.iter().filter(|slot| slot.get().is_some()).count()
    }

    #[must_use]
    pub fn library(&self) -> &GermlineLibrary {
        &self.library
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.library.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }
}

impl GermlineSequenceProvider for GermlineResolver {
    fn full_sequence_with_p(&self, id: &str) -> Result<Arc<NucleotideSequence>, ResolveError> {
        self.resolve(id)
    }
}
