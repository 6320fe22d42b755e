// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! End-point location for loaded songs.
//!
//! Each song project is expected to carry a region named `End` (any case)
//! at the point where the song is over. Two strategies find it:
//!
//! 1. the host's structured region enumeration, where available;
//! 2. a textual parse of the project's own save file ([`project`]).
//!
//! The strategies stay separate alternatives selected by the reported
//! transport capabilities; their data sources and reliability differ, so
//! they must not be merged.

pub mod project;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::transport::Transport;

/// Conventional name of the region that ends a song, matched case-insensitively
pub const END_MARKER_NAME: &str = "end";

/// Locate the loaded song's end point, in seconds.
///
/// `entry_path` is the setlist entry's own resolved path; it stands in for
/// the project path on hosts that cannot report one. Returns `None` when
/// no `End` region exists anywhere — a valid state that disables automatic
/// switching for this song only.
pub fn locate_end<T: Transport + ?Sized>(transport: &T, entry_path: &Path) -> Option<f64> {
    if transport.capabilities().region_enumeration {
        match transport.regions() {
            Ok(regions) => {
                if let Some(region) = regions
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(END_MARKER_NAME))
                {
                    return Some(region.position);
                }
                debug!("no end region in host enumeration, trying the project file");
            }
            Err(e) => warn!("region enumeration failed: {e}"),
        }
    }

    let path = transport
        .current_project_path()
        .unwrap_or_else(|| entry_path.to_path_buf());
    match fs::read_to_string(&path) {
        Ok(text) => project::find_region(&text, END_MARKER_NAME),
        Err(e) => {
            warn!("cannot read project file {}: {e}", path.display());
            None
        }
    }
}
