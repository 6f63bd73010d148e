//! Timed playback.
//!
//! A [`PlaybackDriver`] advances a [`FrameGrabber`] one frame per tick while
//! it is playing. Ticks run at a fixed interval that does not depend on the
//! video's frame rate, and playback pauses itself at the last frame or on the
//! first failure.
//!
//! # Example
//!
//! ```no_run
//! use stillframe::{FrameGrabber, PlaybackDriver};
//!
//! let mut grabber = FrameGrabber::open("input.mp4")?;
//! let mut driver = PlaybackDriver::new();
//! driver.play();
//!
//! let outcome = driver.run(&mut grabber, |grabber| {
//!     if let Some(label) = grabber.position_label() {
//!         println!("{label}");
//!     }
//! });
//! println!("stopped: {outcome:?}");
//! # Ok::<(), stillframe::StillframeError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use crate::{decoder::VideoDecoder, error::StillframeError, grabber::FrameGrabber};

/// Default tick interval, roughly 30 ticks per second.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to stop
/// [`PlaybackDriver::run`] at its next tick.
///
/// # Example
///
/// ```
/// use stillframe::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the driver advances on ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    /// Advance one frame per tick.
    Playing,
    /// Ignore ticks. This is the initial state.
    #[default]
    Paused,
}

impl Display for PlaybackState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Result of one [`PlaybackDriver::tick`].
#[derive(Debug)]
pub enum TickOutcome {
    /// Paused or cancelled; the grabber was not touched.
    Idle,
    /// Advanced to the given frame.
    Advanced(u64),
    /// Already at the last frame. The driver paused itself.
    Finished,
    /// Advancing failed. The driver paused itself and the grabber kept its
    /// last good frame.
    Stopped(StillframeError),
}

/// Play/pause state plus a fixed tick interval.
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    state: PlaybackState,
    interval: Duration,
    token: CancellationToken,
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDriver {
    /// A paused driver ticking every [`DEFAULT_TICK_INTERVAL`].
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Paused,
            interval: DEFAULT_TICK_INTERVAL,
            token: CancellationToken::new(),
        }
    }

    /// Set the tick interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Use `token` to stop [`run`](PlaybackDriver::run) from elsewhere.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// The tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// A clone of the driver's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn play(&mut self) {
        self.set_state(PlaybackState::Playing);
    }

    pub fn pause(&mut self) {
        self.set_state(PlaybackState::Paused);
    }

    /// Switch between playing and paused.
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.play(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            log::debug!("Playback {state}");
            self.state = state;
        }
    }

    /// Handle one tick.
    pub fn tick<D: VideoDecoder>(&mut self, grabber: &mut FrameGrabber<D>) -> TickOutcome {
        if !self.is_playing() || self.token.is_cancelled() {
            return TickOutcome::Idle;
        }

        let at_last_frame = match (grabber.current_index(), grabber.metadata()) {
            (Some(index), Some(metadata)) => metadata.last_frame() == Some(index),
            _ => false,
        };
        if at_last_frame {
            log::info!("Playback reached the last frame");
            self.pause();
            return TickOutcome::Finished;
        }

        match grabber.advance() {
            Ok(()) => match grabber.current_index() {
                Some(index) => TickOutcome::Advanced(index),
                None => {
                    self.pause();
                    TickOutcome::Stopped(StillframeError::NoVideoLoaded)
                }
            },
            Err(error) => {
                log::warn!("Playback stopped: {error}");
                self.pause();
                TickOutcome::Stopped(error)
            }
        }
    }

    /// Tick on the calling thread until playback pauses, finishes, fails, or
    /// the token is cancelled. `on_frame` runs after every advance.
    ///
    /// Returns the outcome that ended the loop; [`TickOutcome::Idle`] means
    /// the driver was paused or cancelled.
    pub fn run<D, F>(&mut self, grabber: &mut FrameGrabber<D>, mut on_frame: F) -> TickOutcome
    where
        D: VideoDecoder,
        F: FnMut(&FrameGrabber<D>),
    {
        loop {
            match self.tick(grabber) {
                TickOutcome::Advanced(_) => on_frame(grabber),
                outcome => return outcome,
            }
            thread::sleep(self.interval);
        }
    }
}
