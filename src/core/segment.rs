use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::nucleotide::{Nucleotide, NucleotideSequence};
use crate::core::types::{GeneType, JunctionSide, SegmentId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Segment has an empty sequence")]
    EmptySequence,

    #[error(
        "{side} junction at position {position} with {length} P-nucleotides does not fit in a sequence of length {sequence_length}"
    )]
    JunctionOutOfBounds {
        side: JunctionSide,
        position: usize,
        length: usize,
        sequence_length: usize,
    },

    #[error("More than one {0} junction")]
    DuplicateJunction(JunctionSide),

    #[error("5' junction at {five_prime} lies downstream of 3' junction at {three_prime}")]
    CrossedJunctions { five_prime: usize, three_prime: usize },

    #[error("{side} palindrome '{found}' does not match the reverse complement '{expected}'")]
    PalindromeMismatch {
        side: JunctionSide,
        expected: String,
        found: String,
    },
}

/// A recombination boundary carrying P-nucleotides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PJunction {
    pub side: JunctionSide,

    /// Boundary coordinate (0..=len) the palindrome is copied next to
    pub position: usize,

    /// Number of P-nucleotides (k)
    pub length: usize,

    /// Annotated palindrome content, checked against the derived one on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palindrome: Option<NucleotideSequence>,
}

impl PJunction {
    #[must_use]
    pub fn new(side: JunctionSide, position: usize, length: usize) -> Self {
        Self {
            side,
            position,
            length,
            palindrome: None,
        }
    }

    #[must_use]
    pub fn with_palindrome(mut self, palindrome: NucleotideSequence) -> Self {
        self.palindrome = Some(palindrome);
        self
    }

    /// Half-open range of the base sequence the palindrome is copied from
    fn source_range(&self) -> Option<(usize, usize)> {
        match self.side {
            JunctionSide::ThreePrime => {
                Some((self.position.checked_sub(self.length)?, self.position))
            }
            JunctionSide::FivePrime => {
                Some((self.position, self.position.checked_add(self.length)?))
            }
        }
    }

    /// Derive the P-nucleotides for this junction from the base sequence.
    ///
    /// The palindrome is the reverse complement of the `length` bases adjacent
    /// to `position`: upstream of it for a 3' junction, downstream for a 5' one.
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::JunctionOutOfBounds` if those bases fall outside
    /// the sequence.
    pub fn derive_palindrome(
        &self,
        base: &NucleotideSequence,
    ) -> Result<NucleotideSequence, SegmentError> {
        let out_of_bounds = || SegmentError::JunctionOutOfBounds {
            side: self.side,
            position: self.position,
            length: self.length,
            sequence_length: base.len(),
        };

        let (start, end) = self.source_range().ok_or_else(out_of_bounds)?;
        let adjacent = base
            .subsequence(start, end)
            .map_err(|_| out_of_bounds())?;
        Ok(adjacent.reverse_complement())
    }
}

/// A germline gene segment from the reference library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GermlineSegment {
    /// Unique identifier (gene/allele designation)
    pub id: SegmentId,

    pub gene_type: GeneType,

    /// Germline-encoded base sequence, without P-nucleotides
    pub sequence: NucleotideSequence,

    /// At most one junction per side
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub junctions: Vec<PJunction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GermlineSegment {
    pub fn new(id: impl Into<String>, gene_type: GeneType, sequence: NucleotideSequence) -> Self {
        Self {
            id: SegmentId::new(id),
            gene_type,
            sequence,
            junctions: Vec::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_junction(mut self, junction: PJunction) -> Self {
        self.junctions.push(junction);
        self
    }

    /// Get the junction on the given side, if any
    #[must_use]
    pub fn junction(&self, side: JunctionSide) -> Option<&PJunction> {
        self.junctions.iter().find(|j| j.side == side)
    }

    /// Total number of P-nucleotides across all junctions
    #[must_use]
    pub fn p_length(&self) -> usize {
        self.junctions.iter().map(|j| j.length).sum()
    }

    /// Length of the full sequence including P-nucleotides
    #[must_use]
    pub fn full_length(&self) -> usize {
        self.sequence.len() + self.p_length()
    }

    /// Check the segment for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a `SegmentError` if the sequence is empty, a side has more than
    /// one junction, a junction does not fit in the sequence, the 5' junction
    /// lies after the 3' junction, or an annotated palindrome disagrees with
    /// the derived one.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.sequence.is_empty() {
            return Err(SegmentError::EmptySequence);
        }

        for side in [JunctionSide::FivePrime, JunctionSide::ThreePrime] {
            if self.junctions.iter().filter(|j| j.side == side).count() > 1 {
                return Err(SegmentError::DuplicateJunction(side));
            }
        }

        if let (Some(five), Some(three)) = (
            self.junction(JunctionSide::FivePrime),
            self.junction(JunctionSide::ThreePrime),
        ) {
            if five.position > three.position {
                return Err(SegmentError::CrossedJunctions {
                    five_prime: five.position,
                    three_prime: three.position,
                });
            }
        }

        for junction in &self.junctions {
            let derived = junction.derive_palindrome(&self.sequence)?;
            if let Some(annotated) = &junction.palindrome {
                if *annotated != derived {
                    return Err(SegmentError::PalindromeMismatch {
                        side: junction.side,
                        expected: derived.to_string(),
                        found: annotated.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Build the full sequence as it appears in a rearranged receptor:
    /// `P5 + base + P3`.
    ///
    /// The palindrome content comes from the bases adjacent to each junction
    /// position, but the P-nucleotides always extend the segment end: the 5'
    /// palindrome is a prefix of the result and the 3' palindrome a suffix.
    ///
    /// # Errors
    ///
    /// Returns a `SegmentError` if the segment fails [`validate`](Self::validate).
    pub fn full_sequence_with_p(&self) -> Result<NucleotideSequence, SegmentError> {
        self.validate()?;

        let palindrome = |side| {
            self.junction(side)
                .map(|junction| junction.derive_palindrome(&self.sequence))
                .transpose()
        };
        let five_prime = palindrome(JunctionSide::FivePrime)?;
        let three_prime = palindrome(JunctionSide::ThreePrime)?;

        let mut bases: Vec<Nucleotide> = Vec::with_capacity(self.full_length());
        if let Some(p) = &five_prime {
            bases.extend_from_slice(p.as_slice());
        }
        bases.extend_from_slice(self.sequence.as_slice());
        if let Some(p) = &three_prime {
            bases.extend_from_slice(p.as_slice());
        }

        Ok(NucleotideSequence::from_nucleotides(bases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> NucleotideSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_three_prime_extension() {
        let segment = GermlineSegment::new("IGHV-TEST", GeneType::V, seq("ACGTACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 8, 2));

        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "ACGTACGTAC");
        assert_eq!(full.len(), segment.sequence.len() + 2);
    }

    #[test]
    fn test_five_prime_extension() {
        let segment = GermlineSegment::new("IGHJ-TEST", GeneType::J, seq("AACTGG"))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 0, 3));

        // revcomp(AAC) = GTT
        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "GTTAACTGG");
    }

    #[test]
    fn test_both_junctions() {
        let segment = GermlineSegment::new("IGHD-TEST", GeneType::D, seq("GGTACC"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 6, 1))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 0, 2));

        // 5': revcomp(GG) = CC, 3': revcomp(C) = G
        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "CCGGTACCG");
        assert_eq!(segment.p_length(), 3);
    }

    #[test]
    fn test_boundary_inside_sequence() {
        // Boundary 4 from the end: palindrome from the bases before it, appended
        let segment = GermlineSegment::new("IGHV-TEST", GeneType::V, seq("ACGTACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 4, 2));

        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "ACGTACGTAC");
        assert_eq!(full.subsequence(0, 8).unwrap(), segment.sequence);

        // 5' boundary at 2: revcomp(GT) prepended
        let segment = GermlineSegment::new("IGHJ-TEST", GeneType::J, seq("ACGTACGT"))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 2, 2));
        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "ACACGTACGT");
        assert_eq!(full.subsequence(2, 10).unwrap(), segment.sequence);
    }

    #[test]
    fn test_palindromes_are_prefix_and_suffix() {
        let segment = GermlineSegment::new("IGHD-TEST", GeneType::D, seq("GGTACCAT"))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 1, 2))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 5, 3));

        // 5': revcomp(GT) = AC, 3': revcomp(TAC) = GTA
        let full = segment.full_sequence_with_p().unwrap();
        assert_eq!(full.to_string(), "ACGGTACCATGTA");
        assert_eq!(full.len(), segment.full_length());
    }

    #[test]
    fn test_no_junctions() {
        let segment = GermlineSegment::new("IGHG1", GeneType::C, seq("ACGT"));
        assert_eq!(segment.full_sequence_with_p().unwrap(), segment.sequence);
    }

    #[test]
    fn test_zero_length_junction() {
        let segment = GermlineSegment::new("IGHV-TEST", GeneType::V, seq("ACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 4, 0));
        assert_eq!(segment.full_sequence_with_p().unwrap().to_string(), "ACGT");
    }

    #[test]
    fn test_junction_out_of_bounds() {
        let segment = GermlineSegment::new("IGHV-TEST", GeneType::V, seq("ACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 2, 3));
        assert!(matches!(
            segment.validate(),
            Err(SegmentError::JunctionOutOfBounds { .. })
        ));

        let segment = GermlineSegment::new("IGHJ-TEST", GeneType::J, seq("ACGT"))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 3, 2));
        assert!(segment.full_sequence_with_p().is_err());

        let segment = GermlineSegment::new("IGHV-TEST", GeneType::V, seq("ACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 5, 0));
        assert!(segment.validate().is_err());
    }

    #[test]
    fn test_duplicate_and_crossed_junctions() {
        let duplicate = GermlineSegment::new("D", GeneType::D, seq("ACGTACGT"))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 8, 1))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 7, 1));
        assert_eq!(
            duplicate.validate(),
            Err(SegmentError::DuplicateJunction(JunctionSide::ThreePrime))
        );

        let crossed = GermlineSegment::new("D", GeneType::D, seq("ACGTACGT"))
            .with_junction(PJunction::new(JunctionSide::FivePrime, 6, 1))
            .with_junction(PJunction::new(JunctionSide::ThreePrime, 2, 1));
        assert_eq!(
            crossed.validate(),
            Err(SegmentError::CrossedJunctions {
                five_prime: 6,
                three_prime: 2
            })
        );
    }

    #[test]
    fn test_annotated_palindrome() {
        let good = GermlineSegment::new("V", GeneType::V, seq("ACGTACGT"))
            .with_junction(
                PJunction::new(JunctionSide::ThreePrime, 8, 2).with_palindrome(seq("AC")),
            );
        assert!(good.validate().is_ok());

        let bad = GermlineSegment::new("V", GeneType::V, seq("ACGTACGT"))
            .with_junction(
                PJunction::new(JunctionSide::ThreePrime, 8, 2).with_palindrome(seq("GT")),
            );
        assert!(matches!(
            bad.validate(),
            Err(SegmentError::PalindromeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let segment = GermlineSegment::new("V", GeneType::V, NucleotideSequence::default());
        assert_eq!(segment.validate(), Err(SegmentError::EmptySequence));
    }
}
