// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! SEGUE — automatic setlist switching for live backing-track playback.
//!
//! The host DAW owns the audio transport, project loading, and marker
//! storage; this crate decides *when* the current song is over and *which*
//! project to load next:
//!
//! - [`setlist`] loads, validates, and persists the ordered song list;
//! - [`markers`] locates each song's `End` region, via the host's
//!   structured enumeration or a textual parse of the project file;
//! - [`transport`] is the capability-reporting contract a host adapter
//!   implements (a simulated backend ships for development and tests);
//! - [`switcher`] is the transition state machine: it polls position,
//!   fires each switch exactly once, infers loop-backs on hosts that wrap
//!   instead of stopping, and keeps the setlist consistent across
//!   operator skips and reorders.

pub mod error;
pub mod markers;
pub mod setlist;
pub mod switcher;
pub mod transport;

pub use error::{Error, Result};
pub use setlist::{DetectionConfig, Setlist, SetlistEntry};
pub use switcher::{format_time, PlaybackSession, Switcher, SwitcherState, WrapDetector};
pub use transport::{Capabilities, PlayState, Region, StubTransport, Transport};
