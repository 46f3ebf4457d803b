//! Core data types for germline segment resolution.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`NucleotideSequence`]: A validated sequence over `A`, `C`, `G`, `T`, `N`
//! - [`GermlineSegment`]: A V, D, J or C segment with its recombination junctions
//! - [`PJunction`]: A boundary carrying palindromic (P) nucleotides
//! - [`SegmentId`], [`GeneType`], [`JunctionSide`]: Segment metadata types
//!
//! ## P-nucleotides
//!
//! P-nucleotides are the reverse complement of the bases adjacent to a
//! recombination boundary. They extend the segment at the matching end, so a
//! 5' palindrome is prepended and a 3' palindrome appended:
//!
//! | Side | Copied from | Typical segments |
//! |------|-------------|------------------|
//! | 3'   | `k` bases upstream of the boundary | V, D |
//! | 5'   | `k` bases downstream of the boundary | D, J |
//!
//! [`NucleotideSequence`]: nucleotide::NucleotideSequence
//! [`GermlineSegment`]: segment::GermlineSegment
//! [`PJunction`]: segment::PJunction
//! [`SegmentId`]: types::SegmentId
//! [`GeneType`]: types::GeneType
//! [`JunctionSide`]: types::JunctionSide

pub mod nucleotide;
pub mod segment;
pub mod types;
