use serde::{Deserialize, Serialize};

/// Unique identifier for a germline segment in the library (e.g. `IGHV1-2*02`)
///
/// Equality is exact string match; identifiers are never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub String);

impl SegmentId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for SegmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Type of germline gene segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum GeneType {
    /// Variable
    V,
    /// Diversity
    D,
    /// Joining
    J,
    /// Constant
    C,
}

impl GeneType {
    /// Parse a gene type from a single-letter code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "V" => Some(Self::V),
            "D" => Some(Self::D),
            "J" => Some(Self::J),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    /// Infer the gene type from an IMGT-style gene or allele name.
    ///
    /// The name must start with a three letter locus (`IGH`, `IGK`, `IGL`,
    /// `TRA`, `TRB`, `TRG`, `TRD`). The fourth character names the segment,
    /// except for immunoglobulin heavy constant genes (`IGHM`, `IGHG1`, ...).
    /// `IGHD` alone is the delta constant gene; `IGHD3-10` is a diversity gene.
    pub fn infer_from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let locus = upper.get(..3)?;
        if !matches!(locus, "IGH" | "IGK" | "IGL" | "TRA" | "TRB" | "TRG" | "TRD") {
            return None;
        }

        let mut rest = upper[3..].chars();
        let segment = rest.next()?;
        let next = rest.next();

        match segment {
            'V' => Some(Self::V),
            'J' => Some(Self::J),
            'C' => Some(Self::C),
            'D' if next.is_some_and(|c| c.is_ascii_digit()) => Some(Self::D),
            'D' if locus == "IGH" => Some(Self::C),
            'M' | 'G' | 'A' | 'E' if locus == "IGH" => Some(Self::C),
            _ => None,
        }
    }

    /// Default recombination boundaries for this gene type.
    ///
    /// V segments recombine at their 3' end, J segments at their 5' end,
    /// D segments at both ends, and constant segments not at all.
    #[must_use]
    pub fn default_sides(self) -> &'static [JunctionSide] {
        match self {
            Self::V => &[JunctionSide::ThreePrime],
            Self::D => &[JunctionSide::FivePrime, JunctionSide::ThreePrime],
            Self::J => &[JunctionSide::FivePrime],
            Self::C => &[],
        }
    }
}

impl std::fmt::Display for GeneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V => write!(f, "V"),
            Self::D => write!(f, "D"),
            Self::J => write!(f, "J"),
            Self::C => write!(f, "C"),
        }
    }
}

/// Which coding end of a segment a P junction sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionSide {
    /// Palindrome copied from the bases downstream of the boundary
    FivePrime,
    /// Palindrome copied from the bases upstream of the boundary
    ThreePrime,
}

impl std::fmt::Display for JunctionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FivePrime => write!(f, "5'"),
            Self::ThreePrime => write!(f, "3'"),
        }
    }
}
