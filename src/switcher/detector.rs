// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Loop-back detection from consecutive position samples.
//!
//! Some hosts never report "reached end": a project set to repeat wraps
//! its position back to the start instead of stopping, so a plain
//! `position >= end` comparison can miss the moment entirely. The detector
//! infers the wrap from two consecutive poll samples: the position dropped
//! back to near zero after having been either deep into the song or within
//! a short margin of the end point.

use crate::setlist::DetectionConfig;

/// Detects position wrap-around between consecutive poll samples.
///
/// One detector instance belongs to one playback session; it is rebuilt on
/// every song load so no sample leaks across songs.
#[derive(Debug, Clone)]
pub struct WrapDetector {
    config: DetectionConfig,
    last_position: Option<f64>,
}

impl WrapDetector {
    /// Create a detector with the given thresholds
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            last_position: None,
        }
    }

    /// Feed one position sample, in seconds.
    ///
    /// Returns true when this sample, together with the previous one,
    /// indicates the project wrapped past `end` back to the start. The
    /// first sample after a reset never triggers.
    pub fn observe(&mut self, position: f64, end: f64) -> bool {
        let wrapped = match self.last_position {
            Some(last) => {
                position < last
                    && position < self.config.wrap_window
                    && (last > self.config.min_travel || last >= end - self.config.end_margin)
            }
            None => false,
        };
        self.last_position = Some(position);
        wrapped
    }

    /// Forget the previous sample
    pub fn reset(&mut self) {
        self.last_position = None;
    }

    /// The previous sample, if any
    pub fn last_position(&self) -> Option<f64> {
        self.last_position
    }
}

impl Default for WrapDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
