//! The presence overlay.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const FRAMES: &[&str] = &["▁▃▅▇", "▃▅▇▅", "▅▇▅▃", "▇▅▃▁", "▅▃▁▃", "▃▁▃▅"];

/// A decorative speaking indicator.
///
/// The overlay is a pure function of one boolean: visible and animating
/// while something is speaking, gone otherwise. It has no data model of
/// its own beyond the drawing handle.
pub struct PresenceOverlay {
    bar: Option<ProgressBar>,
}

impl PresenceOverlay {
    /// Creates a hidden overlay.
    #[inline]
    pub fn new() -> Self {
        Self { bar: None }
    }

    /// Shows or hides the overlay.
    pub fn set_speaking(&mut self, speaking: bool) {
        if speaking {
            if self.bar.is_none() {
                let style = ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap()
                    .tick_strings(FRAMES);
                let bar = ProgressBar::new_spinner();
                bar.set_style(style);
                bar.set_message("🤖 speaking...");
                bar.enable_steady_tick(Duration::from_millis(120));
                self.bar = Some(bar);
            }
        } else if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for PresenceOverlay {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
