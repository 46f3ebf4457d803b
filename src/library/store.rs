use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::segment::{GermlineSegment, SegmentError};
use crate::core::types::{GeneType, SegmentId};
use crate::parsing::ParseError;
use crate::utils::validation::{
    compute_signature, validate_segment_id, ValidationError, MAX_SEGMENTS,
};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to read library: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse library: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to load reference files: {0}")]
    LoadError(#[from] ParseError),

    #[error("Duplicate segment identifier '{0}'")]
    DuplicateId(SegmentId),

    #[error("Invalid segment identifier '{id}': {source}")]
    InvalidSegmentId {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Malformed segment '{id}': {source}")]
    InvalidSegment {
        id: SegmentId,
        #[source]
        source: SegmentError,
    },

    #[error("Duplicate junction annotation for '{0}'")]
    DuplicateAnnotation(SegmentId),

    #[error("Junction annotation for '{0}' has no matching sequence")]
    OrphanAnnotation(SegmentId),

    #[error("Segment '{0}' has no junction annotation")]
    MissingAnnotation(SegmentId),

    #[error("Cannot determine gene type of '{0}'; annotate it explicitly")]
    UnknownGeneType(SegmentId),

    #[error("Too many segments: exceeds maximum of {MAX_SEGMENTS}")]
    TooManySegments,
}

/// Library version for compatibility checking
pub const LIBRARY_VERSION: &str = "1.0.0";

/// Serializable library format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryData {
    pub version: String,
    pub created_at: String,
    pub segments: Vec<GermlineSegment>,
}

/// An immutable, validated set of germline segments indexed by identifier.
///
/// Every constructor validates eagerly: a library that exists contains no
/// duplicate identifiers and no segment whose P junctions are inconsistent
/// with its sequence.
#[derive(Debug, Clone)]
pub struct GermlineLibrary {
    segments: Vec<GermlineSegment>,

    /// Index: segment ID -> index in segments vec
    id_to_index: HashMap<SegmentId, usize>,

    /// MD5 over sorted `id=md5(sequence)` pairs
    signature: Option<String>,
}

impl GermlineLibrary {
    /// Build a library from segments, failing on the first malformed entry
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::TooManySegments`, `LibraryError::InvalidSegmentId`,
    /// `LibraryError::DuplicateId` or `LibraryError::InvalidSegment`.
    pub fn from_segments(segments: Vec<GermlineSegment>) -> Result<Self, LibraryError> {
        if segments.len() > MAX_SEGMENTS {
            return Err(LibraryError::TooManySegments);
        }

        let mut id_to_index = HashMap::with_capacity(segments.len());
        let mut fingerprints = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            validate_segment_id(segment.id.as_str()).map_err(|source| {
                LibraryError::InvalidSegmentId {
                    id: segment.id.to_string(),
                    source,
                }
            })?;

            if id_to_index.insert(segment.id.clone(), index).is_some() {
                return Err(LibraryError::DuplicateId(segment.id.clone()));
            }

            segment
                .validate()
                .map_err(|source| LibraryError::InvalidSegment {
                    id: segment.id.clone(),
                    source,
                })?;

            fingerprints.push(format!("{}={}", segment.id, segment.sequence.md5()));
        }

        let signature = Some(compute_signature(&fingerprints)).filter(|s| !s.is_empty());

        debug!(segments = segments.len(), "Built germline library");

        Ok(Self {
            segments,
            id_to_index,
            signature,
        })
    }

    /// Load library from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::ReadError` if the file cannot be read, or any
    /// error from [`from_json`](Self::from_json).
    pub fn load_from_file(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse library from JSON string
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::ParseError` for invalid JSON (including invalid
    /// nucleotide symbols), or any validation error from
    /// [`from_segments`](Self::from_segments).
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let data: LibraryData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != LIBRARY_VERSION {
            warn!(
                "Library version mismatch (expected {}, found {})",
                LIBRARY_VERSION, data.version
            );
        }

        Self::from_segments(data.segments)
    }

    /// Export library to JSON
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, LibraryError> {
        let data = LibraryData {
            version: LIBRARY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            segments: self.segments.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Get a segment by ID
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&GermlineSegment> {
        self.index_of(id).map(|idx| &self.segments[idx])
    }

    /// Position of a segment in the library, stable for the library's lifetime
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// All segments in load order
    #[must_use]
    pub fn segments(&self) -> &[GermlineSegment] {
        &self.segments
    }

    /// Segments of a single gene type, in load order
    pub fn by_gene_type(&self, gene_type: GeneType) -> impl Iterator<Item = &GermlineSegment> {
        self.segments
            .iter()
            .filter(move |s| s.gene_type == gene_type)
    }

    /// Deterministic fingerprint of identifiers and sequences, `None` when empty
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Number of segments in library
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if library is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segment::PJunction;
    use crate::core::types::JunctionSide;

    fn segment(id: &str, gene_type: GeneType, sequence: &str) -> GermlineSegment {
        GermlineSegment::new(id, gene_type, sequence.parse().unwrap())
    }

    fn test_library() -> GermlineLibrary {
        GermlineLibrary::from_segments(vec![
            segment("IGHV1-2*02", GeneType::V, "ACGTACGT")
                .with_junction(PJunction::new(JunctionSide::ThreePrime, 8, 2)),
            segment("IGHD3-10*01", GeneType::D, "GGTACC"),
            segment("IGHJ4*02", GeneType::J, "AACTGG")
                .with_junction(PJunction::new(JunctionSide::FivePrime, 0, 1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_library_get_by_id() {
        let library = test_library();
        assert_eq!(library.len(), 3);

        let v = library.get("IGHV1-2*02").unwrap();
        assert_eq!(v.gene_type, GeneType::V);
        assert_eq!(library.index_of("IGHJ4*02"), Some(2));
        assert!(library.contains("IGHD3-10*01"));
    }

    #[test]
    fn test_library_get_nonexistent() {
        let library = test_library();
        assert!(library.get("IGHV9-99*01").is_none());
        // Exact match only
        assert!(library.get("ighv1-2*02").is_none());
        assert!(library.get("IGHV1-2*02 ").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = GermlineLibrary::from_segments(vec![
            segment("IGHV1-2*02", GeneType::V, "ACGT"),
            segment("IGHV1-2*02", GeneType::V, "ACGA"),
        ]);
        assert!(matches!(result, Err(LibraryError::DuplicateId(id)) if id.as_str() == "IGHV1-2*02"));
    }

    #[test]
    fn test_invalid_segment_rejected() {
        let result = GermlineLibrary::from_segments(vec![segment("IGHV1-2*02", GeneType::V, "ACGT")
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 2, 5))]);
        assert!(matches!(result, Err(LibraryError::InvalidSegment { .. })));

        let result = GermlineLibrary::from_segments(vec![segment("", GeneType::V, "ACGT")]);
        assert!(matches!(result, Err(LibraryError::InvalidSegmentId { .. })));
    }

    #[test]
    fn test_by_gene_type() {
        let library = test_library();
        let ids: Vec<&str> = library
            .by_gene_type(GeneType::J)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["IGHJ4*02"]);
        assert_eq!(library.by_gene_type(GeneType::C).count(), 0);
    }

    #[test]
    fn test_signature() {
        let library = test_library();
        let signature = library.signature().unwrap();
        assert_eq!(signature.len(), 32);

        // Independent of load order
        let mut reordered = library.segments().to_vec();
        reordered.reverse();
        let reordered = GermlineLibrary::from_segments(reordered).unwrap();
        assert_eq!(reordered.signature(), Some(signature));

        let empty = GermlineLibrary::from_segments(Vec::new()).unwrap();
        assert!(empty.signature().is_none());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_json_roundtrip_preserves_junctions() {
        let library = test_library();
        let json = library.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"three_prime\""));

        let reloaded = GermlineLibrary::from_json(&json).unwrap();
        assert_eq!(reloaded.segments(), library.segments());
        assert_eq!(reloaded.signature(), library.signature());
    }

    #[test]
    fn test_from_json_rejects_invalid_symbols() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "2024-01-01T00:00:00Z",
            "segments": [
                {"id": "IGHV1-2*02", "gene_type": "V", "sequence": "ACGU"}
            ]
        }"#;
        assert!(matches!(
            GermlineLibrary::from_json(json),
            Err(LibraryError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "2024-01-01T00:00:00Z",
            "segments": [
                {"id": "IGHJ4*02", "gene_type": "J", "sequence": "ACGT"},
                {"id": "IGHJ4*02", "gene_type": "J", "sequence": "ACGT"}
            ]
        }"#;
        assert!(matches!(
            GermlineLibrary::from_json(json),
            Err(LibraryError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let library = test_library();
        let mut temp = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        temp.write_all(library.to_json().unwrap().as_bytes()).unwrap();
        temp.flush().unwrap();

        let loaded = GermlineLibrary::load_from_file(temp.path()).unwrap();
        assert_eq!(loaded.len(), 3);
    }
}
