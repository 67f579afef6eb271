//! Frame-by-frame playback of step-wise algorithms.
//!
//! Every widget advances one step per animation frame and redraws in between.
//! `Playback` is that loop: it calls [`Stepper::advance`] once per frame,
//! hands the stepper to an observer for redrawing, and sleeps for the frame
//! interval. Stopping playback is just flipping a [`StopHandle`], which is the
//! equivalent of clearing the timer in the browser.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// An algorithm that can be advanced one step at a time.
pub trait Stepper {
    /// Performs one step of the algorithm.
    ///
    /// # Errors
    ///
    /// If the algorithm is not in a state where it can step, e.g. it has not
    /// been started.
    fn advance(&mut self) -> Result<(), String>;

    /// Whether the algorithm has nothing left to do.
    fn is_finished(&self) -> bool;
}

/// A cloneable flag for cancelling playback from an observer or another
/// thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Creates a new, un-triggered `StopHandle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that playback stop before the next frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears a previous stop request so the handle can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The stepper reported that it was finished.
    Finished {
        /// The number of frames played.
        frames: usize,
    },
    /// The `StopHandle` was triggered.
    Stopped {
        /// The number of frames played.
        frames: usize,
    },
    /// The frame cap was reached before the stepper finished.
    FrameLimit {
        /// The number of frames played.
        frames: usize,
    },
}

impl Outcome {
    /// The number of frames played.
    #[must_use]
    pub const fn frames(&self) -> usize {
        match self {
            Self::Finished { frames } | Self::Stopped { frames } | Self::FrameLimit { frames } => *frames,
        }
    }
}

/// Drives a `Stepper` one step per frame.
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    /// The pause between frames.
    interval: Duration,
    /// The maximum number of frames to play.
    max_frames: Option<usize>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl Playback {
    /// Creates a new `Playback` with the given pause between frames.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_frames: None,
        }
    }

    /// Creates a `Playback` that does not pause between frames.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Caps the number of frames.
    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// The pause between frames.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Plays the stepper until it finishes, the frame cap is hit, or `stop` is
    /// triggered.
    ///
    /// The first step runs immediately; later steps run after `interval`.
    /// `on_frame` receives the 1-based frame number and the stepper after each
    /// step.
    ///
    /// # Errors
    ///
    /// Any error returned by [`Stepper::advance`].
    pub fn run<S: Stepper, F: FnMut(usize, &S)>(
        &self,
        stepper: &mut S,
        stop: &StopHandle,
        mut on_frame: F,
    ) -> Result<Outcome, String> {
        let mut frames = 0;
        loop {
            if stop.is_stopped() {
                ftlog::debug!("Playback stopped after {frames} frames");
                return Ok(Outcome::Stopped { frames });
            }
            if stepper.is_finished() {
                ftlog::debug!("Playback finished after {frames} frames");
                return Ok(Outcome::Finished { frames });
            }
            if self.max_frames.is_some_and(|max| frames >= max) {
                ftlog::debug!("Playback hit the frame limit of {frames}");
                return Ok(Outcome::FrameLimit { frames });
            }

            if frames > 0 && !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }

            stepper.advance()?;
            frames += 1;
            on_frame(frames, stepper);
        }
    }
}
