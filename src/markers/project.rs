// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fallback parser for marker records in project save files.
//!
//! Some hosts never expose regions through a structured call, but their
//! project save format is plain text with one whitespace-tokenized record
//! per line:
//!
//! ```text
//! MARKER <kind> <position> <name> ...
//! ```
//!
//! Kind 2 records are regions, kind 1 records are point markers. Names may
//! be double-quoted to carry whitespace. Trailing fields (color, flags)
//! are host-specific and ignored here.

use std::collections::HashMap;

use crate::transport::Region;

/// First token of a marker/region record line
pub const MARKER_TOKEN: &str = "MARKER";

/// Record kind for regions; point markers are kind 1
pub const REGION_KIND: u32 = 2;

/// Parse every region record out of project file text.
///
/// Point markers, malformed records, and unrelated lines are skipped.
/// Records keep their file order; callers that want name lookup semantics
/// should use [`find_region`].
pub fn parse_regions(text: &str) -> Vec<Region> {
    text.lines().filter_map(parse_region_line).collect()
}

/// Look up a region position by name, case-insensitively.
///
/// When a name repeats, the last occurrence in the file wins.
pub fn find_region(text: &str, name: &str) -> Option<f64> {
    let mut by_name: HashMap<String, f64> = HashMap::new();
    for region in parse_regions(text) {
        by_name.insert(region.name.to_lowercase(), region.position);
    }
    by_name.get(&name.to_lowercase()).copied()
}

fn parse_region_line(line: &str) -> Option<Region> {
    let (tag, rest) = next_token(line)?;
    if tag != MARKER_TOKEN {
        return None;
    }
    let (kind, rest) = next_token(rest)?;
    if kind.parse::<u32>().ok()? != REGION_KIND {
        return None;
    }
    let (position, rest) = next_token(rest)?;
    let position = position.parse::<f64>().ok()?;
    let name = parse_name(rest)?;
    Some(Region { name, position })
}

/// Split the next whitespace-delimited token off the front of `s`
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

/// Extract the name field: a double-quoted span (quotes stripped, embedded
/// whitespace preserved) or a bare token
fn parse_name(s: &str) -> Option<String> {
    let s = s.trim_start();
    if let Some(quoted) = s.strip_prefix('"') {
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    } else {
        next_token(s).map(|(token, _)| token.to_string())
    }
}
