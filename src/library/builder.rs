//! Library builder for assembling a germline library from reference files.
//!
//! The `LibraryBuilder` collates sequences (FASTA) with junction annotations
//! (TSV) and produces a validated [`GermlineLibrary`]. Every inconsistency in
//! the inputs is reported as an error when [`LibraryBuilder::build`] is called.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::segment::{GermlineSegment, PJunction};
use crate::core::types::{GeneType, JunctionSide, SegmentId};
use crate::library::store::{GermlineLibrary, LibraryError};
use crate::parsing::annotations::{parse_annotation_file, JunctionAnnotation};
use crate::parsing::fasta::{is_fasta_file, parse_fasta_file, FastaHeaderStyle, FastaRecord};

/// Options for loading a library from FASTA and annotation files
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// How identifiers are read from FASTA headers
    pub header_style: FastaHeaderStyle,

    /// P-nucleotide count applied at the default boundaries of unannotated
    /// segments (V: 3' end, J: 5' start, D: both, C: none). 0 disables.
    pub default_p_length: usize,

    /// Treat segments without an annotation as an error
    pub require_annotations: bool,
}

/// Builder that collates sequences and junction annotations
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    config: LoaderConfig,

    /// Sequences in the order first seen
    records: Vec<FastaRecord>,

    annotations: Vec<JunctionAnnotation>,
}

impl LibraryBuilder {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add sequences from a FASTA file
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::LoadError` if the file cannot be parsed.
    pub fn add_fasta(&mut self, path: &Path) -> Result<(), LibraryError> {
        if !is_fasta_file(path) {
            warn!("{} does not have a FASTA extension", path.display());
        }
        let records = parse_fasta_file(path, self.config.header_style)?;
        debug!("Read {} sequences from {}", records.len(), path.display());
        self.records.extend(records);
        Ok(())
    }

    /// Add junction annotations from a TSV file
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::LoadError` if the file cannot be parsed.
    pub fn add_annotations(&mut self, path: &Path) -> Result<(), LibraryError> {
        let annotations = parse_annotation_file(path)?;
        debug!("Read {} annotations from {}", annotations.len(), path.display());
        self.annotations.extend(annotations);
        Ok(())
    }

    #[must_use]
    pub fn with_records(mut self, records: Vec<FastaRecord>) -> Self {
        self.records.extend(records);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<JunctionAnnotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    /// Combine sequences and annotations into a validated library
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateAnnotation` or `LibraryError::OrphanAnnotation`
    /// for inconsistent annotations, `LibraryError::MissingAnnotation` when
    /// annotations are required, `LibraryError::UnknownGeneType` when the gene
    /// type can be neither read nor inferred, or any error from
    /// [`GermlineLibrary::from_segments`].
    pub fn build(self) -> Result<GermlineLibrary, LibraryError> {
        let mut by_id: HashMap<SegmentId, JunctionAnnotation> = HashMap::new();
        for annotation in self.annotations {
            if by_id.contains_key(&annotation.id) {
                return Err(LibraryError::DuplicateAnnotation(annotation.id));
            }
            by_id.insert(annotation.id.clone(), annotation);
        }

        let mut segments = Vec::with_capacity(self.records.len());
        let mut unannotated = 0usize;

        for record in self.records {
            let id = SegmentId::new(record.id);
            let annotation = by_id.remove(&id);

            let gene_type = annotation
                .as_ref()
                .and_then(|a| a.gene_type)
                .or_else(|| GeneType::infer_from_name(id.as_str()))
                .ok_or_else(|| LibraryError::UnknownGeneType(id.clone()))?;

            let junctions = match annotation {
                Some(annotation) => annotation.junctions,
                None if self.config.require_annotations => {
                    return Err(LibraryError::MissingAnnotation(id));
                }
                None => {
                    unannotated += 1;
                    default_junctions(
                        gene_type,
                        record.sequence.len(),
                        self.config.default_p_length,
                    )
                }
            };

            segments.push(GermlineSegment {
                id,
                gene_type,
                sequence: record.sequence,
                junctions,
                description: record.description,
            });
        }

        // Report the first leftover in identifier order so errors are reproducible
        if let Some(orphan) = by_id.into_keys().min() {
            return Err(LibraryError::OrphanAnnotation(orphan));
        }

        if unannotated > 0 {
            warn!(
                "{unannotated} segments have no junction annotation; using {} default P-nucleotides",
                self.config.default_p_length
            );
        }

        GermlineLibrary::from_segments(segments)
    }
}

/// Junctions at the conventional coding ends for a gene type
fn default_junctions(
    gene_type: GeneType,
    sequence_length: usize,
    p_length: usize,
) -> Vec<PJunction> {
    if p_length == 0 {
        return Vec::new();
    }

    gene_type
        .default_sides()
        .iter()
        .map(|&side| match side {
            JunctionSide::FivePrime => PJunction::new(side, 0, p_length),
            JunctionSide::ThreePrime => PJunction::new(side, sequence_length, p_length),
        })
        .collect()
}
