//! Centralized validation and helper functions.

/// Maximum number of segments allowed in a single input (DOS protection)
pub const MAX_SEGMENTS: usize = 100_000;

/// Maximum length of a segment identifier in bytes
pub const MAX_SEGMENT_ID_LENGTH: usize = 256;

/// Identifier validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty segment identifier")]
    EmptyId,
    #[error("Segment identifier too long: exceeds {MAX_SEGMENT_ID_LENGTH} bytes")]
    IdTooLong,
    #[error("Segment identifier contains whitespace or control character {0:?}")]
    InvalidIdCharacter(char),
}

/// Validate a segment identifier from reference data.
///
/// Identifiers are opaque, so only structural problems are rejected: empty
/// strings, overlong strings, and whitespace or control characters (which
/// cannot survive a round trip through FASTA headers or TSV columns).
///
/// # Examples
///
/// ```
/// use germline_resolver::utils::validation::validate_segment_id;
///
/// assert!(validate_segment_id("IGHV1-2*02").is_ok());
/// assert!(validate_segment_id("").is_err());
/// assert!(validate_segment_id("IGHV1-2 *02").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptyId`, `ValidationError::IdTooLong` or
/// `ValidationError::InvalidIdCharacter`.
pub fn validate_segment_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }

    if id.len() > MAX_SEGMENT_ID_LENGTH {
        return Err(ValidationError::IdTooLong);
    }

    if let Some(c) = id.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Compute a signature hash from per-segment fingerprints.
///
/// The signature is computed by:
/// 1. Sorting the fingerprints alphabetically
/// 2. Joining them with commas
/// 3. Computing MD5 of the concatenated string
///
/// This provides a deterministic identifier for a library regardless of
/// segment order.
#[must_use]
pub fn compute_signature(fingerprints: &[String]) -> String {
    if fingerprints.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&str> = fingerprints.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let concatenated = sorted.join(",");
    let digest = md5::compute(concatenated.as_bytes());
    format!("{digest:x}")
}

/// Check if adding another segment would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new segment.
/// Returns the error message to report if adding would exceed the limit, None
/// if safe to add.
#[must_use]
pub fn check_segment_limit(count: usize) -> Option<String> {
    if count >= MAX_SEGMENTS {
        Some(format!(
            "Too many segments: adding another would exceed maximum of {MAX_SEGMENTS}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_id() {
        assert!(validate_segment_id("IGHV1-2*02").is_ok());
        assert!(validate_segment_id("TRBV12-3*01").is_ok());
        assert!(validate_segment_id("custom|id").is_ok());

        assert_eq!(validate_segment_id(""), Err(ValidationError::EmptyId));
        assert_eq!(
            validate_segment_id("IGHV1\t2"),
            Err(ValidationError::InvalidIdCharacter('\t'))
        );
        assert!(validate_segment_id("IGHV\0").is_err());
        assert_eq!(
            validate_segment_id(&"A".repeat(MAX_SEGMENT_ID_LENGTH + 1)),
            Err(ValidationError::IdTooLong)
        );
        assert!(validate_segment_id(&"A".repeat(MAX_SEGMENT_ID_LENGTH)).is_ok());
    }

    #[test]
    fn test_compute_signature() {
        let fingerprints = vec!["b=2222".to_string(), "a=1111".to_string()];

        let sig = compute_signature(&fingerprints);
        assert_eq!(sig.len(), 32);

        // Order does not matter
        let reversed: Vec<String> = fingerprints.iter().rev().cloned().collect();
        assert_eq!(compute_signature(&reversed), sig);

        // Empty input gives empty string
        assert_eq!(compute_signature(&[]), "");
    }

    #[test]
    fn test_check_segment_limit() {
        assert!(check_segment_limit(100).is_none());
        assert!(check_segment_limit(MAX_SEGMENTS - 1).is_none());
        let message = check_segment_limit(MAX_SEGMENTS).unwrap();
        assert!(message.contains(&MAX_SEGMENTS.to_string()));
        assert!(check_segment_limit(MAX_SEGMENTS + 1).is_some());
    }
}
