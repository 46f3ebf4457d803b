use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid nucleotide '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("Range {start}..{end} is out of bounds for sequence of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// A single nucleotide from the germline alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
    /// Ambiguous base
    N,
}

impl Nucleotide {
    /// Parse a nucleotide from an ASCII byte (case-insensitive)
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            b'N' => Some(Self::N),
            _ => None,
        }
    }

    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::T => Self::A,
            Self::N => Self::N,
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
            Self::N => b'N',
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

/// An immutable, validated nucleotide sequence.
///
/// Symbols are restricted to `A`, `C`, `G`, `T` and `N`. Lowercase input is
/// accepted and stored uppercase; anything else is rejected at construction,
/// so every value of this type is known to be well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NucleotideSequence {
    bases: Vec<Nucleotide>,
}

impl NucleotideSequence {
    /// Parse a sequence from raw bytes
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidSymbol` for the first byte outside the alphabet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SequenceError> {
        let bases = bytes
            .iter()
            .enumerate()
            .map(|(position, &b)| {
                Nucleotide::from_byte(b).ok_or(SequenceError::InvalidSymbol {
                    symbol: char::from(b),
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bases })
    }

    #[must_use]
    pub fn from_nucleotides(bases: Vec<Nucleotide>) -> Self {
        Self { bases }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.bases
    }

    /// Copy out the half-open range `start..end`
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::OutOfBounds` if the range is inverted or exceeds the sequence.
    pub fn subsequence(&self, start: usize, end: usize) -> Result<Self, SequenceError> {
        self.bases
            .get(start..end)
            .map(|slice| Self {
                bases: slice.to_vec(),
            })
            .ok_or(SequenceError::OutOfBounds {
                start,
                end,
                len: self.bases.len(),
            })
    }

    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        Self {
            bases: self.bases.iter().rev().map(|n| n.complement()).collect(),
        }
    }

    /// Uppercase ASCII representation
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bases.iter().map(|n| n.as_byte()).collect()
    }

    /// MD5 checksum of the uppercase sequence, lowercase hex
    #[must_use]
    pub fn md5(&self) -> String {
        format!("{:x}", md5::compute(self.to_bytes()))
    }
}

impl std::str::FromStr for NucleotideSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl Serialize for NucleotideSequence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NucleotideSequence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for NucleotideSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Every byte is ASCII by construction
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
