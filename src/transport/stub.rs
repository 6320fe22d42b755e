// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Simulated transport backend.
//!
//! Stands in for a real host during development and in the test suite: it
//! "loads" a project by parsing its marker records off disk, advances its
//! position on request, and can be configured to mimic hosts with reduced
//! capabilities or a loop-at-end transport.
//!
//! Clones share state, so a test or the simulator can keep a handle for
//! scripting positions while the switcher owns the adapter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::markers::project;

use super::{Capabilities, PlayState, Region, Transport};

#[derive(Debug, Default)]
struct StubState {
    caps: Capabilities,
    play_state: PlayState,
    position: f64,
    regions: Vec<Region>,
    project: Option<PathBuf>,
    opened: Vec<PathBuf>,
    /// Wrap position to the project start at the last region instead of
    /// running past it (mimics a repeat-enabled host)
    loop_at_end: bool,
    fail_next_open: bool,
}

/// In-memory transport for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
}

impl StubTransport {
    /// Full-capability stub
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub reporting the given capability set
    pub fn with_capabilities(caps: Capabilities) -> Self {
        let stub = Self::default();
        stub.state.lock().unwrap().caps = caps;
        stub
    }

    /// Place the playhead at an absolute position, in seconds
    pub fn set_position(&self, position: f64) {
        self.state.lock().unwrap().position = position;
    }

    /// Current playhead position, in seconds
    pub fn current_position(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    /// Advance the playhead by `seconds` while playing. With loop-at-end
    /// set, the position wraps at the last region instead of running on.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        if state.play_state != PlayState::Playing {
            return;
        }
        state.position += seconds;
        if state.loop_at_end {
            let wrap_at = state
                .regions
                .iter()
                .map(|r| r.position)
                .fold(f64::NAN, f64::max);
            if wrap_at.is_finite() && wrap_at > 0.0 && state.position >= wrap_at {
                state.position -= wrap_at;
            }
        }
    }

    /// Replace the served region list (projects opened later overwrite it)
    pub fn set_regions(&self, regions: Vec<Region>) {
        self.state.lock().unwrap().regions = regions;
    }

    /// Mimic a repeat-enabled host that wraps instead of stopping
    pub fn set_loop_at_end(&self, loop_at_end: bool) {
        self.state.lock().unwrap().loop_at_end = loop_at_end;
    }

    /// Make the next `open_project` call fail
    pub fn fail_next_open(&self) {
        self.state.lock().unwrap().fail_next_open = true;
    }

    /// Whether the transport is currently playing
    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().play_state == PlayState::Playing
    }

    /// Every project path opened so far, in order
    pub fn opened(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().opened.clone()
    }
}

impl Transport for StubTransport {
    fn capabilities(&self) -> Capabilities {
        self.state.lock().unwrap().caps
    }

    fn open_project(&mut self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_open {
            state.fail_next_open = false;
            return Err(Error::Transport(format!(
                "project open failure: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Transport(format!("project open failure: {e}")))?;
        state.regions = project::parse_regions(&text);
        state.project = Some(path.to_path_buf());
        state.opened.push(path.to_path_buf());
        state.position = 0.0;
        state.play_state = PlayState::Stopped;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.state.lock().unwrap().play_state = PlayState::Playing;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.state.lock().unwrap().play_state = PlayState::Stopped;
        Ok(())
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.state.lock().unwrap().position = 0.0;
        Ok(())
    }

    fn play_state(&self) -> Result<PlayState> {
        Ok(self.state.lock().unwrap().play_state)
    }

    fn position(&self) -> Result<f64> {
        Ok(self.state.lock().unwrap().position)
    }

    fn regions(&self) -> Result<Vec<Region>> {
        Ok(self.state.lock().unwrap().regions.clone())
    }

    fn current_project_path(&self) -> Option<PathBuf> {
        let state = self.state.lock().unwrap();
        if state.caps.project_path {
            state.project.clone()
        } else {
            None
        }
    }
}
