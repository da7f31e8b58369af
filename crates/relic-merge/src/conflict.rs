//! Conflict blob content synthesis.

/// Marker opening the current side's section.
const MARKER_CURRENT: &[u8] = b"<<<<<<< current\n";
/// Marker separating the two sides.
const MARKER_SEPARATOR: &[u8] = b"=======\n";
/// Marker closing the other side's section.
const MARKER_END: &[u8] = b">>>>>>>\n";

/// Synthesize the content of a conflict blob.
///
/// Layout, with each side's bytes inserted verbatim (a deleted side
/// contributes an empty section):
///
/// ```text
/// <<<<<<< current
/// <current bytes>=======
/// <other bytes>>>>>>>>
/// ```
pub fn conflict_contents(current: Option<&[u8]>, other: Option<&[u8]>) -> Vec<u8> {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    let mut out = Vec::with_capacity(
        MARKER_CURRENT.len()
            + current.len()
            + MARKER_SEPARATOR.len()
            + other.len()
            + MARKER_END.len(),
    );
    out.extend_from_slice(MARKER_CURRENT);
    out.extend_from_slice(current);
    out.extend_from_slice(MARKER_SEPARATOR);
    out.extend_from_slice(other);
    out.extend_from_slice(MARKER_END);
    out
}
