use std::path::Path;

use crate::core::nucleotide::NucleotideSequence;
use crate::core::segment::PJunction;
use crate::core::types::{GeneType, JunctionSide, SegmentId};
use crate::parsing::ParseError;
use crate::utils::validation::check_segment_limit;

/// Junction annotation for one segment, as supplied by the reference library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionAnnotation {
    pub id: SegmentId,

    /// `None` when the gene type should be inferred from the identifier
    pub gene_type: Option<GeneType>,

    pub junctions: Vec<PJunction>,
}

/// Parse a junction annotation TSV file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_annotation_file(path: &Path) -> Result<Vec<JunctionAnnotation>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_annotation_text(&content)
}

/// Parse junction annotation TSV text.
///
/// Columns: `id`, `gene_type`, `five_prime_position`, `five_prime_length`,
/// `three_prime_position`, `three_prime_length`, and optionally
/// `five_prime_palindrome`, `three_prime_palindrome`. Empty fields and `.`
/// mean absent. A junction needs both its position and its length.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 2 fields, a
/// value cannot be parsed, a junction is half specified, or no annotations
/// are found, or `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_annotation_text(text: &str) -> Result<Vec<JunctionAnnotation>, ParseError> {
    let mut annotations = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "id" || first == "segment" || first == "allele" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let id = SegmentId::new(fields[0]);
        let gene_type = match optional(fields[1]) {
            None => None,
            Some(value) => Some(GeneType::parse(value).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid gene type on line {line_num}: '{value}'"
                ))
            })?),
        };

        let mut junctions = Vec::new();
        for (side, position_col, length_col, palindrome_col) in [
            (JunctionSide::FivePrime, 2, 3, 6),
            (JunctionSide::ThreePrime, 4, 5, 7),
        ] {
            if let Some(junction) =
                parse_junction(&fields, side, position_col, length_col, palindrome_col, line_num)?
            {
                junctions.push(junction);
            }
        }

        // Check annotation limit for DOS protection
        if let Some(message) = check_segment_limit(annotations.len()) {
            return Err(ParseError::TooManyRecords(message));
        }

        annotations.push(JunctionAnnotation {
            id,
            gene_type,
            junctions,
        });
    }

    if annotations.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No annotations found in file".to_string(),
        ));
    }

    Ok(annotations)
}

fn optional(field: &str) -> Option<&str> {
    match field {
        "" | "." => None,
        value => Some(value),
    }
}

fn parse_junction(
    fields: &[&str],
    side: JunctionSide,
    position_col: usize,
    length_col: usize,
    palindrome_col: usize,
    line_num: usize,
) -> Result<Option<PJunction>, ParseError> {
    let field = |col: usize| fields.get(col).copied().and_then(optional);

    let parse_number = |col: usize| -> Result<Option<usize>, ParseError> {
        field(col)
            .map(|value| {
                value.parse::<usize>().map_err(|_| {
                    ParseError::InvalidFormat(format!(
                        "Invalid {side} junction value on line {line_num}: '{value}'"
                    ))
                })
            })
            .transpose()
    };

    let position = parse_number(position_col)?;
    let length = parse_number(length_col)?;
    let palindrome = field(palindrome_col)
        .map(|value| {
            value.parse::<NucleotideSequence>().map_err(|e| {
                ParseError::InvalidFormat(format!(
                    "Invalid {side} palindrome on line {line_num}: {e}"
                ))
            })
        })
        .transpose()?;

    match (position, length) {
        (Some(position), Some(length)) => {
            let mut junction = PJunction::new(side, position, length);
            if let Some(palindrome) = palindrome {
                junction = junction.with_palindrome(palindrome);
            }
            Ok(Some(junction))
        }
        (None, None) if palindrome.is_none() => Ok(None),
        _ => Err(ParseError::InvalidFormat(format!(
            "Incomplete {side} junction on line {line_num}: position and length are both required"
        ))),
    }
}
