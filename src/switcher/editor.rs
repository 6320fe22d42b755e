// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Operator-driven setlist edits: skips and reorders.
//!
//! These run between ticks on the same serialized call sequence as the
//! poll loop. A skip suppresses the pending automatic trigger for the song
//! being left before moving; a reorder moves bookkeeping and the on-disk
//! order only — it never touches which song is physically loaded.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::transport::Transport;

use super::Switcher;

impl<T: Transport> Switcher<T> {
    /// Skip to the next song immediately
    pub fn skip_forward(&mut self) -> Result<()> {
        info!("user skip forward triggered");
        let Some(session) = self.session.as_mut() else {
            return Err(Error::NoSongLoaded);
        };
        // suppress any pending automatic trigger for the song being left
        session.switched = true;
        self.stop()?;
        self.switch_to_next()
    }

    /// Skip back to the previous song.
    ///
    /// At the first song this reports [`Error::AlreadyAtStart`] and leaves
    /// playback untouched.
    pub fn skip_backward(&mut self) -> Result<()> {
        info!("user skip backward triggered");
        self.switch_to_previous()
    }

    /// Move the entry at `from_index` so it sits at `to_index`.
    ///
    /// List semantics: remove first, then insert — a single move, not a
    /// swap. The loaded song stays current across the move; only its index
    /// is adjusted. The new order is persisted; a persist failure is
    /// logged and the in-memory order stays authoritative.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> Result<()> {
        let len = self.setlist.len();
        if from_index >= len {
            return Err(Error::IndexOutOfRange {
                index: from_index,
                len,
            });
        }
        if to_index >= len {
            return Err(Error::IndexOutOfRange {
                index: to_index,
                len,
            });
        }
        if from_index == to_index {
            return Ok(());
        }

        let entry = self.setlist.entries.remove(from_index);
        self.setlist.entries.insert(to_index, entry);

        if let Some(session) = self.session.as_mut() {
            let current = session.current_index;
            session.current_index = if current == from_index {
                to_index
            } else if from_index < current && current <= to_index {
                current - 1
            } else if to_index <= current && current < from_index {
                current + 1
            } else {
                current
            };
        }
        info!(
            "reordered: moved song from position {} to {}",
            from_index + 1,
            to_index + 1
        );

        if let Err(e) = self.setlist.save(&self.setlist_path) {
            warn!("{e}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::switcher_over;
    use super::*;
    use crate::setlist::Setlist;
    use crate::switcher::SwitcherState;

    const FIVE: &[(&str, Option<f64>)] = &[
        ("alpha", Some(100.0)),
        ("bravo", Some(100.0)),
        ("charlie", Some(100.0)),
        ("delta", Some(100.0)),
        ("echo", Some(100.0)),
    ];

    #[test]
    fn test_reorder_moves_entry() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.reorder(0, 3).unwrap();
        let names: Vec<&str> = switcher
            .setlist()
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["bravo", "charlie", "delta", "alpha", "echo"]);
    }

    #[test]
    fn test_reorder_moving_the_current_song() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.load(2).unwrap();
        switcher.reorder(2, 0).unwrap();
        assert_eq!(switcher.current_index(), Some(0));
        assert_eq!(switcher.setlist().entries[0].name, "charlie");
    }

    #[test]
    fn test_reorder_shifting_down_past_current() {
        // moved entry came from before the current song and lands after it
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.load(2).unwrap();
        switcher.reorder(0, 4).unwrap();
        assert_eq!(switcher.current_index(), Some(1));
        assert_eq!(switcher.setlist().entries[1].name, "charlie");
    }

    #[test]
    fn test_reorder_shifting_up_past_current() {
        // moved entry came from after the current song and lands before it
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.load(2).unwrap();
        switcher.reorder(4, 0).unwrap();
        assert_eq!(switcher.current_index(), Some(3));
        assert_eq!(switcher.setlist().entries[3].name, "charlie");
    }

    #[test]
    fn test_reorder_elsewhere_leaves_current_alone() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.load(0).unwrap();
        switcher.reorder(2, 4).unwrap();
        assert_eq!(switcher.current_index(), Some(0));
        assert_eq!(switcher.setlist().entries[0].name, "alpha");
    }

    #[test]
    fn test_reorder_out_of_range_is_a_no_op() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        let before = switcher.setlist().entries.clone();
        assert!(matches!(
            switcher.reorder(7, 0),
            Err(Error::IndexOutOfRange { index: 7, len: 5 })
        ));
        assert!(matches!(
            switcher.reorder(0, 7),
            Err(Error::IndexOutOfRange { index: 7, len: 5 })
        ));
        assert_eq!(switcher.setlist().entries, before);
    }

    #[test]
    fn test_reorder_same_index_is_a_no_op() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        let before = switcher.setlist().entries.clone();
        switcher.reorder(2, 2).unwrap();
        assert_eq!(switcher.setlist().entries, before);
    }

    #[test]
    fn test_reorder_persists_new_order() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        switcher.reorder(4, 0).unwrap();

        let reloaded = Setlist::load(switcher.setlist_path()).unwrap();
        let names: Vec<&str> = reloaded.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["echo", "alpha", "bravo", "charlie", "delta"]);
        // base_path survived the automated save
        assert_eq!(reloaded.base_path, switcher.setlist().base_path);
    }

    #[test]
    fn test_reorder_never_reloads_the_playing_song() {
        let (_dir, stub, mut switcher) = switcher_over(FIVE);
        switcher.load(2).unwrap();
        switcher.play().unwrap();
        let opened_before = stub.opened().len();

        switcher.reorder(2, 0).unwrap();
        assert_eq!(stub.opened().len(), opened_before);
        assert!(stub.is_playing());
    }

    #[test]
    fn test_skip_forward_advances() {
        let (_dir, stub, mut switcher) = switcher_over(FIVE);
        switcher.load(0).unwrap();
        switcher.play().unwrap();

        switcher.skip_forward().unwrap();
        assert_eq!(switcher.current_index(), Some(1));
        assert!(stub.is_playing());
        assert!(!switcher.session().unwrap().switched);
    }

    #[test]
    fn test_skip_forward_on_last_song_finishes() {
        let (_dir, stub, mut switcher) = switcher_over(FIVE);
        switcher.load(4).unwrap();
        switcher.play().unwrap();

        switcher.skip_forward().unwrap();
        assert_eq!(switcher.state(), SwitcherState::Finished);
        assert!(!stub.is_playing());
    }

    #[test]
    fn test_skip_backward_goes_back() {
        let (_dir, stub, mut switcher) = switcher_over(FIVE);
        switcher.load(2).unwrap();
        switcher.play().unwrap();

        switcher.skip_backward().unwrap();
        assert_eq!(switcher.current_index(), Some(1));
        assert!(stub.is_playing());
    }

    #[test]
    fn test_skip_backward_at_start_changes_nothing() {
        let (_dir, stub, mut switcher) = switcher_over(FIVE);
        switcher.load(0).unwrap();
        switcher.play().unwrap();

        assert!(matches!(
            switcher.skip_backward(),
            Err(Error::AlreadyAtStart)
        ));
        assert_eq!(switcher.current_index(), Some(0));
        assert!(stub.is_playing());
        assert!(switcher.error().is_none());
    }

    #[test]
    fn test_skip_without_a_loaded_song() {
        let (_dir, _stub, mut switcher) = switcher_over(FIVE);
        assert!(matches!(switcher.skip_forward(), Err(Error::NoSongLoaded)));
        assert!(matches!(switcher.skip_backward(), Err(Error::NoSongLoaded)));
    }
}
