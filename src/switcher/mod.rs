// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transition state machine for automatic song switching.
//!
//! Owns the current setlist position, polls the host transport for
//! play-state and position, and fires the switch to the next song exactly
//! once per loaded song — when the position passes the song's end point,
//! or when the wrap detector infers a loop-back on hosts that repeat
//! instead of stopping.
//!
//! Everything here runs on one serialized call sequence: the host calls
//! [`Switcher::tick`] on a ~100 ms period and operator actions run to
//! completion between ticks, so no locking is needed inside the core.

pub mod detector;
mod editor;

pub use detector::WrapDetector;

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::markers;
use crate::setlist::Setlist;
use crate::transport::{PlayState, Transport};

/// Machine states.
///
/// `Loading` is transient — project opens are synchronous, so callers only
/// ever observe it from within `load` itself. `Loaded` is the observable
/// "cued, not yet started" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitcherState {
    /// No song loaded
    #[default]
    Idle,
    /// A project open is in flight
    Loading,
    /// Song cued but not playing
    Loaded,
    /// Song playing
    Playing,
    /// Ran past the last setlist entry; terminal
    Finished,
}

/// Per-loaded-song state.
///
/// Rebuilt on every load so no end point, wrap sample, or switch guard
/// carries over from the previous song.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    /// Index of the loaded song in the setlist
    pub current_index: usize,
    /// Cached end point in seconds; `None` disables automatic switching
    pub end_position: Option<f64>,
    /// Single-fire guard: set once a switch has been triggered or suppressed
    pub switched: bool,
    /// Mirror of the transport's play state as of the last poll
    pub is_playing: bool,
    detector: WrapDetector,
}

impl PlaybackSession {
    fn new(current_index: usize, end_position: Option<f64>, detector: WrapDetector) -> Self {
        Self {
            current_index,
            end_position,
            switched: false,
            is_playing: false,
            detector,
        }
    }
}

/// The transition state machine.
///
/// Generic over the injected [`Transport`] so a host binding and the test
/// double share one implementation; host differences are handled through
/// the transport's reported capabilities, not separate logic trees.
pub struct Switcher<T: Transport> {
    transport: T,
    setlist: Setlist,
    setlist_path: PathBuf,
    session: Option<PlaybackSession>,
    state: SwitcherState,
    error: Option<String>,
}

impl<T: Transport> Switcher<T> {
    /// Create a switcher over an already-loaded setlist.
    ///
    /// `setlist_path` is where reorders are persisted back to.
    pub fn new(transport: T, setlist: Setlist, setlist_path: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            setlist,
            setlist_path: setlist_path.into(),
            session: None,
            state: SwitcherState::Idle,
            error: None,
        }
    }

    /// Load the setlist document at `path` and create a switcher over it
    pub fn from_file(transport: T, path: &Path) -> Result<Self> {
        let setlist = Setlist::load(path)?;
        Ok(Self::new(transport, setlist, path))
    }

    /// Current machine state
    pub fn state(&self) -> SwitcherState {
        self.state
    }

    /// The loaded song's session, if any
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// The setlist being played
    pub fn setlist(&self) -> &Setlist {
        &self.setlist
    }

    /// Where reorders are persisted back to
    pub fn setlist_path(&self) -> &Path {
        &self.setlist_path
    }

    /// Index of the loaded song, if any
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_index)
    }

    /// The loaded song's end point, if one was found
    pub fn end_position(&self) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.end_position)
    }

    /// Whether playback was running as of the last poll
    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_playing)
    }

    /// Sticky message of the most recent failure, cleared by a successful load
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The underlying transport adapter
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Record a failure so the operator surface can show it; the machine
    /// stays queryable and skip/reorder commands still work
    fn fail(&mut self, err: Error) -> Error {
        error!("{err}");
        self.error = Some(err.to_string());
        err
    }

    /// Load the song at `index` and cue it without starting playback.
    ///
    /// On success the playback session is rebuilt from scratch: the switch
    /// guard rearms and the end point is located once and cached. On
    /// failure the previous song's session stays authoritative.
    pub fn load(&mut self, index: usize) -> Result<()> {
        let len = self.setlist.len();
        if index >= len {
            return Err(self.fail(Error::IndexOutOfRange { index, len }));
        }
        let entry = &self.setlist.entries[index];
        let name = entry.name.clone();
        let path = self.setlist.resolve(&entry.path);
        if !path.exists() {
            return Err(self.fail(Error::SongMissing(path)));
        }

        info!("loading song {}/{}: {}", index + 1, len, name);
        let prior = self.state;
        self.state = SwitcherState::Loading;
        if let Err(e) = self.transport.open_project(&path) {
            self.state = prior;
            return Err(self.fail(e));
        }

        let end_position = markers::locate_end(&self.transport, &path);
        match end_position {
            Some(position) => info!("end point at {}", format_time(position)),
            None => warn!("no end marker in {name}; this song will not switch automatically"),
        }

        self.session = Some(PlaybackSession::new(
            index,
            end_position,
            WrapDetector::new(self.setlist.detection),
        ));
        self.state = SwitcherState::Loaded;
        self.error = None;
        Ok(())
    }

    /// Start playback of the cued song from the top
    pub fn play(&mut self) -> Result<()> {
        if self.session.is_none() {
            return Err(Error::NoSongLoaded);
        }
        if self.transport.capabilities().seek_to_start {
            if let Err(e) = self.transport.seek_to_start() {
                return Err(self.fail(e));
            }
        }
        if let Err(e) = self.transport.play() {
            return Err(self.fail(e));
        }
        if let Some(session) = self.session.as_mut() {
            session.is_playing = true;
            info!("starting playback of song {}", session.current_index + 1);
        }
        self.state = SwitcherState::Playing;
        Ok(())
    }

    /// Stop playback; the loaded song stays cued
    pub fn stop(&mut self) -> Result<()> {
        if let Err(e) = self.transport.stop() {
            return Err(self.fail(e));
        }
        if let Some(session) = self.session.as_mut() {
            session.is_playing = false;
        }
        if self.state == SwitcherState::Playing {
            self.state = SwitcherState::Loaded;
        }
        info!("playback stopped");
        Ok(())
    }

    /// One poll of the transport; the host calls this on a ~100 ms period.
    ///
    /// Decides whether the loaded song is over and advances the setlist at
    /// most once per load. A stop not initiated by the machine is treated
    /// as operator intent and disarms the pending automatic switch rather
    /// than fighting it.
    pub fn tick(&mut self) -> Result<()> {
        if !matches!(self.state, SwitcherState::Loaded | SwitcherState::Playing) {
            return Ok(());
        }
        let play_state = match self.transport.play_state() {
            Ok(state) => state,
            Err(e) => return Err(self.fail(e)),
        };
        let playing = play_state == PlayState::Playing;
        let position = if playing {
            match self.transport.position() {
                Ok(position) => Some(position),
                Err(e) => return Err(self.fail(e)),
            }
        } else {
            None
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.is_playing = playing;

        if !playing {
            if !session.switched {
                info!("playback stopped outside the switcher; automatic switching disarmed");
                session.switched = true;
            }
            self.state = SwitcherState::Loaded;
            return Ok(());
        }
        self.state = SwitcherState::Playing;

        let (Some(end), Some(position)) = (session.end_position, position) else {
            return Ok(());
        };
        let past_end = position >= end;
        let wrapped = session.detector.observe(position, end);
        if session.switched || !(past_end || wrapped) {
            return Ok(());
        }
        session.switched = true;
        if wrapped && !past_end {
            info!("loop-back detected at {position:.1}s; treating as end of song");
        }
        self.switch_to_next()
    }

    /// Advance to the next setlist entry, or finish the set.
    ///
    /// Past the last entry the machine stops playback, drops the session,
    /// and enters [`SwitcherState::Finished`] — a terminal state, not an
    /// error. A failed load leaves the previous song's session intact.
    pub fn switch_to_next(&mut self) -> Result<()> {
        let Some(session) = self.session.as_ref() else {
            return Err(Error::NoSongLoaded);
        };
        let next = session.current_index + 1;
        if next >= self.setlist.len() {
            info!("end of setlist reached");
            if let Err(e) = self.transport.stop() {
                warn!("transport stop failed at end of setlist: {e}");
            }
            self.session = None;
            self.state = SwitcherState::Finished;
            return Ok(());
        }

        info!("switching to next song ({}/{})", next + 1, self.setlist.len());
        self.load(next)?;
        self.play()
    }

    /// Go back one setlist entry and play it from the top.
    ///
    /// Refuses to move before the first song: [`Error::AlreadyAtStart`] is
    /// returned and the current song keeps playing untouched.
    pub fn switch_to_previous(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(Error::NoSongLoaded);
        };
        if session.current_index == 0 {
            info!("already at first song");
            return Err(Error::AlreadyAtStart);
        }
        let previous = session.current_index - 1;
        // leaving this song on purpose; no automatic trigger may fire for it
        session.switched = true;

        self.stop()?;
        self.load(previous)?;
        self.play()
    }

    /// One-line human-readable status for an operator surface
    pub fn status(&self) -> String {
        if let Some(message) = &self.error {
            return format!("ERROR: {message}");
        }
        let Some(session) = &self.session else {
            return match self.state {
                SwitcherState::Finished => "End of setlist".to_string(),
                _ => "No song loaded".to_string(),
            };
        };

        let name = self
            .setlist
            .entries
            .get(session.current_index)
            .map(|e| e.name.as_str())
            .unwrap_or("Unknown");
        let playing = if session.is_playing { "Playing" } else { "Paused" };
        let prefix = format!(
            "Song {}/{}: {} - {}",
            session.current_index + 1,
            self.setlist.len(),
            name,
            playing
        );

        match (self.transport.position(), session.end_position) {
            (Ok(position), Some(end)) => {
                format!("{prefix} - {} / {}", format_time(position), format_time(end))
            }
            (Ok(position), None) => format!("{prefix} - {}", format_time(position)),
            (Err(_), _) => prefix,
        }
    }
}

/// Format a position in seconds as `HH:MM:SS`
pub fn format_time(position: f64) -> String {
    let total = position.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
