// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for SEGUE.
//!
//! One variant per failure the switching core can report. Setlist-level
//! failures are sticky on the state machine; navigation refusals like
//! [`Error::AlreadyAtStart`] are not.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the switching core
#[derive(Error, Debug)]
pub enum Error {
    /// Setlist document does not exist
    #[error("setlist not found: {0}")]
    ConfigMissing(PathBuf),

    /// Setlist document is not parseable JSON
    #[error("setlist parse error: {0}")]
    ConfigMalformed(String),

    /// Setlist document parses but violates the schema
    #[error("invalid setlist: {0}")]
    SchemaInvalid(String),

    /// A song's resolved project file does not exist
    #[error("song file not found: {0}")]
    SongMissing(PathBuf),

    /// Song index outside the setlist
    #[error("invalid song index: {index} (setlist has {len} songs)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation requires a loaded song
    #[error("no song loaded")]
    NoSongLoaded,

    /// Backward navigation refused at the first song; non-fatal
    #[error("already at first song")]
    AlreadyAtStart,

    /// Saving the setlist document failed; the in-memory order stays
    /// authoritative until the next restart
    #[error("failed to save setlist: {0}")]
    PersistFailure(String),

    /// A host transport call failed
    #[error("transport error: {0}")]
    Transport(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the SEGUE Error
pub type Result<T> = std::result::Result<T, Error>;
