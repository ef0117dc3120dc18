//! Per-account capture state machine.
//!
//! Transitions are driven from two sides: client-reported stream events
//! (the browser asked for the camera, got it, was refused, or the
//! shopper backed out) and server clock ticks while a countdown is
//! running. All transitions funnel through this type so the invariants
//! hold in one place: a countdown only runs while a stream is held, and
//! the stream is released exactly once.

/// Length of the capture window, in one-second ticks.
pub const COUNTDOWN_TICKS: u32 = 30;

/// A client-reported capture event.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// The shopper pressed start: request the stream, or if the
    /// preview is already up, begin the countdown.
    Start,
    /// The browser granted the media stream.
    StreamGranted,
    /// The browser refused the media stream.
    StreamDenied {
        /// The client-side error, shown back on the scan page.
        reason: String,
    },
    /// The shopper backed out of the capture.
    Cancel,
}

/// Where a capture currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanPhase {
    /// No capture in progress.
    #[default]
    Idle,
    /// Waiting for the browser to grant the stream.
    AcquiringStream,
    /// Stream held, preview up, countdown not started.
    Preview,
    /// Countdown running.
    Counting {
        /// Ticks left before capture.
        remaining: u32,
    },
    /// Capture window closed, record being written.
    Persisting,
}

impl ScanPhase {
    /// Stable string form used in status payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AcquiringStream => "acquiringStream",
            Self::Preview => "preview",
            Self::Counting { .. } => "counting",
            Self::Persisting => "persisting",
        }
    }
}

/// Holds the client's media stream open on the server's books.
///
/// The stream itself lives in the browser; this guard tracks that the
/// server believes one is open and runs its release hook exactly once,
/// on explicit release or on drop, whichever comes first.
pub struct StreamGuard {
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl StreamGuard {
    /// Create a guard with a release hook.
    #[must_use]
    pub fn new(on_release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Release the stream. A second release is a no-op.
    pub fn release(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGuard")
            .field("released", &self.on_release.is_none())
            .finish()
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running.
    Continue {
        /// Ticks left.
        remaining: u32,
    },
    /// The window closed on this tick; persist the record.
    Completed,
    /// No countdown is running (cancelled or never started).
    Ignored,
}

/// One account's capture state.
#[derive(Debug, Default)]
pub struct ScanMachine {
    phase: ScanPhase,
    guard: Option<StreamGuard>,
    media_error: Option<String>,
}

impl ScanMachine {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    /// The last stream refusal, if the capture failed on permissions.
    #[must_use]
    pub fn media_error(&self) -> Option<&str> {
        self.media_error.as_deref()
    }

    /// Whether the machine is back to idle with no stream held.
    ///
    /// A settled machine can be discarded; any media error it carries
    /// was already reported on the event that produced it, and a fresh
    /// start clears it anyway.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.phase, ScanPhase::Idle) && self.guard.is_none()
    }

    /// Shopper pressed start.
    ///
    /// From idle this begins stream acquisition and clears any stale
    /// media error. From preview it starts the countdown. Anywhere
    /// else it is ignored.
    pub fn start(&mut self) {
        match self.phase {
            ScanPhase::Idle => {
                self.media_error = None;
                self.phase = ScanPhase::AcquiringStream;
            }
            ScanPhase::Preview => {
                self.phase = ScanPhase::Counting {
                    remaining: COUNTDOWN_TICKS,
                };
            }
            _ => {}
        }
    }

    /// Browser granted the stream.
    ///
    /// Ignored (and the guard released) unless a stream was being
    /// acquired.
    pub fn grant(&mut self, guard: StreamGuard) {
        if self.phase == ScanPhase::AcquiringStream {
            self.guard = Some(guard);
            self.phase = ScanPhase::Preview;
        }
        // A guard arriving in any other phase drops here, which
        // releases it.
    }

    /// Browser refused the stream.
    pub fn deny(&mut self, reason: String) {
        if self.phase == ScanPhase::AcquiringStream {
            self.media_error = Some(reason);
            self.phase = ScanPhase::Idle;
        }
    }

    /// Shopper backed out. Releases the stream and returns to idle
    /// from any phase.
    pub fn cancel(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            guard.release();
        }
        self.phase = ScanPhase::Idle;
    }

    /// Advance the countdown by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            ScanPhase::Counting { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = ScanPhase::Persisting;
                    TickOutcome::Completed
                } else {
                    self.phase = ScanPhase::Counting { remaining };
                    TickOutcome::Continue { remaining }
                }
            }
            _ => TickOutcome::Ignored,
        }
    }

    /// The completed capture's record was written; back to preview
    /// with the stream still held.
    pub fn persisted(&mut self) {
        if self.phase == ScanPhase::Persisting {
            self.phase = ScanPhase::Preview;
        }
    }

    /// The record write failed; back to preview with the failure
    /// surfaced as a media error.
    pub fn persist_failed(&mut self, reason: String) {
        if self.phase == ScanPhase::Persisting {
            self.media_error = Some(reason);
            self.phase = ScanPhase::Preview;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counted_guard() -> (StreamGuard, Arc<AtomicU32>) {
        let releases = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&releases);
        let guard = StreamGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (guard, releases)
    }

    #[test]
    fn happy_path_reaches_counting_at_full_window() {
        let mut machine = ScanMachine::default();
        machine.start();
        assert_eq!(*machine.phase(), ScanPhase::AcquiringStream);

        let (guard, _) = counted_guard();
        machine.grant(guard);
        assert_eq!(*machine.phase(), ScanPhase::Preview);

        machine.start();
        assert_eq!(
            *machine.phase(),
            ScanPhase::Counting {
                remaining: COUNTDOWN_TICKS
            }
        );
    }

    #[test]
    fn denied_stream_returns_to_idle_with_error() {
        let mut machine = ScanMachine::default();
        machine.start();
        machine.deny("NotAllowedError".into());
        assert_eq!(*machine.phase(), ScanPhase::Idle);
        assert_eq!(machine.media_error(), Some("NotAllowedError"));

        // Starting again clears the stale error
        machine.start();
        assert_eq!(machine.media_error(), None);
    }

    #[test]
    fn cancel_mid_countdown_releases_stream_once_and_idles() {
        let mut machine = ScanMachine::default();
        machine.start();
        let (guard, releases) = counted_guard();
        machine.grant(guard);
        machine.start();

        for _ in 0..15 {
            assert!(matches!(machine.tick(), TickOutcome::Continue { .. }));
        }

        machine.cancel();
        assert_eq!(*machine.phase(), ScanPhase::Idle);
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        // Further ticks are ignored, a second cancel releases nothing
        assert_eq!(machine.tick(), TickOutcome::Ignored);
        machine.cancel();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn countdown_completes_after_exactly_thirty_ticks() {
        let mut machine = ScanMachine::default();
        machine.start();
        let (guard, _) = counted_guard();
        machine.grant(guard);
        machine.start();

        for expected in (1..COUNTDOWN_TICKS).rev() {
            assert_eq!(
                machine.tick(),
                TickOutcome::Continue {
                    remaining: expected
                }
            );
        }
        assert_eq!(machine.tick(), TickOutcome::Completed);
        assert_eq!(*machine.phase(), ScanPhase::Persisting);

        machine.persisted();
        assert_eq!(*machine.phase(), ScanPhase::Preview);
    }

    #[test]
    fn settled_only_when_idle_without_a_stream() {
        let mut machine = ScanMachine::default();
        assert!(machine.is_settled());

        machine.start();
        assert!(!machine.is_settled());

        let (guard, _) = counted_guard();
        machine.grant(guard);
        assert!(!machine.is_settled());

        machine.cancel();
        assert!(machine.is_settled());

        // A deny reason does not keep the machine alive
        machine.start();
        machine.deny("NotAllowedError".into());
        assert!(machine.is_settled());
    }

    #[test]
    fn guard_arriving_outside_acquisition_is_released_immediately() {
        let mut machine = ScanMachine::default();
        let (guard, releases) = counted_guard();
        machine.grant(guard);
        assert_eq!(*machine.phase(), ScanPhase::Idle);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_then_drop_runs_hook_once() {
        let (mut guard, releases) = counted_guard();
        guard.release();
        drop(guard);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn persist_failure_surfaces_as_media_error() {
        let mut machine = ScanMachine::default();
        machine.start();
        let (guard, _) = counted_guard();
        machine.grant(guard);
        machine.start();
        // Drain the countdown
        loop {
            match machine.tick() {
                TickOutcome::Continue { .. } => {}
                TickOutcome::Completed => break,
                TickOutcome::Ignored => unreachable!(),
            }
        }
        machine.persist_failed("store unreachable".into());
        assert_eq!(*machine.phase(), ScanPhase::Preview);
        assert_eq!(machine.media_error(), Some("store unreachable"));
    }
}
