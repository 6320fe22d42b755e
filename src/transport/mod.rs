// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Host transport abstraction.
//!
//! The host DAW owns project loading and the audio transport; the switching
//! core only ever talks to it through the [`Transport`] trait. Host
//! platforms differ in what they expose, so an adapter reports its
//! [`Capabilities`] and the core selects strategies accordingly instead of
//! keeping per-host logic trees.

pub mod stub;

pub use stub::StubTransport;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Playback state reported by the host transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// A named region or marker enumerated from the loaded project
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Display name, quotes already stripped
    pub name: String,
    /// Start position in seconds from project start
    pub position: f64,
}

/// Optional host facilities.
///
/// Strategy selection happens at runtime against these flags; a capability
/// reported `false` means the corresponding call must not be relied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Host can enumerate the loaded project's markers/regions
    pub region_enumeration: bool,
    /// Host can report the loaded project's own file path
    pub project_path: bool,
    /// Host can rewind the edit cursor to the project start
    pub seek_to_start: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            region_enumeration: true,
            project_path: true,
            seek_to_start: true,
        }
    }
}

impl Capabilities {
    /// A minimal host exposing only open/play/stop/position
    pub fn none() -> Self {
        Self {
            region_enumeration: false,
            project_path: false,
            seek_to_start: false,
        }
    }
}

/// Contract the switching core requires from the host.
///
/// All calls are synchronous fire-and-return; none of them block. Failures
/// surface as [`crate::Error::Transport`].
pub trait Transport {
    /// Facilities this host actually exposes
    fn capabilities(&self) -> Capabilities;

    /// Open a project file, replacing whatever was loaded
    fn open_project(&mut self, path: &Path) -> Result<()>;

    /// Start playback from the current cursor
    fn play(&mut self) -> Result<()>;

    /// Stop playback
    fn stop(&mut self) -> Result<()>;

    /// Rewind the cursor to the project start.
    /// Only called when `capabilities().seek_to_start` is reported.
    fn seek_to_start(&mut self) -> Result<()>;

    /// Current playback state
    fn play_state(&self) -> Result<PlayState>;

    /// Current playback position in seconds from project start
    fn position(&self) -> Result<f64>;

    /// Markers/regions of the loaded project.
    /// Only meaningful when `capabilities().region_enumeration` is reported.
    fn regions(&self) -> Result<Vec<Region>>;

    /// File path of the loaded project, `None` when the host cannot report one
    fn current_project_path(&self) -> Option<PathBuf>;
}
