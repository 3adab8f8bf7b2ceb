//! Debounced write coalescing for autosave.
//!
//! Two write patterns share one gate. Review edits debounce: every edit
//! re-arms a deadline and one write lands after the typing stops. Ritual
//! state changes throttle: writes land at most once per interval while
//! toggles burst. The coalescer tracks both and the caller polls it with
//! the current time; nothing here spawns a thread or touches a clock.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::plan::Review;
use crate::store::Database;

/// Review edits settle for this long before a write.
pub const DEBOUNCE_MS: u64 = 800;

/// Burst writes land at most once per this interval.
pub const MIN_WRITE_INTERVAL_MS: u64 = 250;

/// Where the autosave currently stands. Surfaced to the user as the
/// saving indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Nothing has changed since the last write
    Idle,
    /// Changes are waiting on the debounce deadline
    Pending,
    /// The last write landed
    Saved,
}

/// Debounce/throttle gate in front of a persistence call.
///
/// The caller reports changes, then asks `write_due` on every poll and
/// performs the actual write itself. Failed writes are reported back so
/// the gate re-arms instead of dropping the change.
#[derive(Debug, Clone)]
pub struct WriteCoalescer {
    debounce: Duration,
    min_write_interval: Duration,
    status: SaveStatus,
    /// Deadline armed by `note_change`; each change pushes it out.
    deadline: Option<NaiveDateTime>,
    /// Set by `note_burst`; cleared by the next write.
    burst_dirty: bool,
    last_write: Option<NaiveDateTime>,
}

impl WriteCoalescer {
    pub fn new(debounce_ms: u64, min_write_interval_ms: u64) -> Self {
        Self {
            debounce: Duration::milliseconds(debounce_ms as i64),
            min_write_interval: Duration::milliseconds(min_write_interval_ms as i64),
            status: SaveStatus::Idle,
            deadline: None,
            burst_dirty: false,
            last_write: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Whether unwritten changes exist.
    pub fn dirty(&self) -> bool {
        self.deadline.is_some() || self.burst_dirty
    }

    /// Report a debounced change. Re-arms the deadline.
    pub fn note_change(&mut self, now: NaiveDateTime) {
        self.deadline = Some(now + self.debounce);
        self.status = SaveStatus::Pending;
    }

    /// Report a throttled change. Does not move any deadline; the write
    /// lands on the next poll past the minimum interval.
    pub fn note_burst(&mut self) {
        self.burst_dirty = true;
        self.status = SaveStatus::Pending;
    }

    /// Whether the caller should write now.
    pub fn write_due(&self, now: NaiveDateTime) -> bool {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                return true;
            }
        }
        if self.burst_dirty {
            return match self.last_write {
                None => true,
                Some(last) => now - last >= self.min_write_interval,
            };
        }
        false
    }

    /// Record a successful write.
    pub fn mark_written(&mut self, now: NaiveDateTime) {
        self.deadline = None;
        self.burst_dirty = false;
        self.last_write = Some(now);
        self.status = SaveStatus::Saved;
    }

    /// Record a failed write. The change stays dirty and the deadline
    /// re-arms so the next poll window retries.
    pub fn mark_failed(&mut self, now: NaiveDateTime) {
        self.deadline = Some(now + self.debounce);
        self.status = SaveStatus::Pending;
    }

    /// Claim any pending change for an immediate final write. Returns
    /// true at most once per dirty period; used at teardown.
    pub fn take_pending(&mut self) -> bool {
        let was_dirty = self.dirty();
        self.deadline = None;
        self.burst_dirty = false;
        was_dirty
    }
}

impl Default for WriteCoalescer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS, MIN_WRITE_INTERVAL_MS)
    }
}

/// A review under edit with debounced persistence.
///
/// Edits mutate the in-memory review and arm the coalescer; `poll`
/// performs the write once the debounce settles. Dropping without
/// `finish` loses at most the last debounce window.
pub struct ReviewAutosave {
    review: Review,
    coalescer: WriteCoalescer,
}

impl ReviewAutosave {
    pub fn new(review: Review, debounce_ms: u64, min_write_interval_ms: u64) -> Self {
        Self {
            review,
            coalescer: WriteCoalescer::new(debounce_ms, min_write_interval_ms),
        }
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn status(&self) -> SaveStatus {
        self.coalescer.status()
    }

    pub fn edit_notes(&mut self, notes: &str, now: NaiveDateTime) {
        self.review.notes = notes.to_string();
        self.review.updated_at = now;
        self.coalescer.note_change(now);
    }

    /// Add a win. Blank wins are dropped without touching the deadline.
    pub fn add_win(&mut self, win: &str, now: NaiveDateTime) {
        let win = win.trim();
        if win.is_empty() {
            return;
        }
        self.review.wins.push(win.to_string());
        self.review.updated_at = now;
        self.coalescer.note_change(now);
    }

    /// Remove a win by index. An out-of-range index is ignored.
    pub fn remove_win(&mut self, index: usize, now: NaiveDateTime) {
        if index >= self.review.wins.len() {
            return;
        }
        self.review.wins.remove(index);
        self.review.updated_at = now;
        self.coalescer.note_change(now);
    }

    /// Write if the debounce has settled. Returns true when a write
    /// landed. A failed write keeps the review dirty and retries on a
    /// later poll.
    pub fn poll(&mut self, db: &Database, now: NaiveDateTime) -> bool {
        if !self.coalescer.write_due(now) {
            return false;
        }
        match db.upsert_review(&self.review) {
            Ok(()) => {
                self.coalescer.mark_written(now);
                true
            }
            Err(e) => {
                tracing::warn!("review autosave failed, will retry: {e}");
                self.coalescer.mark_failed(now);
                false
            }
        }
    }

    /// Flush any pending change immediately and consume the autosave.
    pub fn finish(mut self, db: &Database) -> Result<(), StoreError> {
        if self.coalescer.take_pending() {
            db.upsert_review(&self.review)?;
        }
        Ok(())
    }
}
