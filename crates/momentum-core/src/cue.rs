//! Audible cue for the wind-down chime.
//!
//! The CLI has no audio stack; the cue is the terminal bell. Writing it
//! can fail on a closed pipe, which must never take the ritual loop
//! down, so failures are logged and swallowed.

use std::io::Write;

/// Rings the terminal bell when the wind-down window opens.
#[derive(Debug, Clone, Copy)]
pub struct Chime {
    enabled: bool,
}

impl Chime {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Emit the cue. A disabled chime is silent; a write error is logged
    /// and otherwise ignored.
    pub fn ring(&self) {
        if !self.enabled {
            return;
        }
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            tracing::warn!("chime cue failed: {e}");
        }
    }
}
