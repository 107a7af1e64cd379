//! SVG template handling.
//!
//! Templates are parsed once into an owned event list with quick-xml,
//! checked for well-formedness before anything else happens, and written
//! back out with targeted edits: province fills and appended layers.

pub mod anchor;
pub mod document;
pub mod icon;

pub use anchor::{extract_anchors, AnchorTable, Point, ANCHOR_SUFFIX};
pub use document::{attribute, SvgDocument, TemplateError, TemplateKind};
pub use icon::{IconPlacement, IconTemplate};

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub(crate) fn number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Replaces characters that are awkward in element ids with `-`.
pub(crate) fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Extracts every number from an attribute value such as a path, a
/// viewBox or a transform list.
pub(crate) fn parse_numbers(s: &str) -> Vec<f64> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if !(c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+') {
            i += 1;
            continue;
        }
        let start = i;
        let mut seen_dot = c == b'.';
        let mut seen_exp = false;
        i += 1;
        while i < bytes.len() {
            let d = bytes[i];
            if d.is_ascii_digit() {
                i += 1;
            } else if d == b'.' && !seen_dot && !seen_exp {
                seen_dot = true;
                i += 1;
            } else if (d == b'e' || d == b'E') && !seen_exp {
                seen_exp = true;
                i += 1;
                if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
                    i += 1;
                }
            } else {
                break;
            }
        }
        if let Ok(v) = s[start..i].parse::<f64>() {
            out.push(v);
        }
    }
    out
}
