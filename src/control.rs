use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const RESUME_POLL: Duration = Duration::from_millis(100);
const SLEEP_STEP: Duration = Duration::from_millis(50);

/// The stop flag was observed while waiting or sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Shared pause/resume/stop handle, toggled from any thread while the engine
/// runs on its own.
///
/// Cloning shares the underlying state. The resume request is one-shot: the
/// engine's blocking wait consumes it exactly once.
#[derive(Debug, Clone, Default)]
pub struct ReplayControls {
    inner: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    paused: AtomicBool,
    resume_requested: AtomicBool,
    stop: AtomicBool,
}

impl ReplayControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
        self.inner.resume_requested.store(true, Ordering::SeqCst);
    }

    /// Flip between paused and running. Returns true when now paused.
    pub fn toggle(&self) -> bool {
        if self.is_paused() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub fn resume_requested(&self) -> bool {
        self.inner.resume_requested.load(Ordering::SeqCst)
    }

    /// Request cooperative cancellation. Observed at every pause checkpoint.
    pub fn request_stop(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.stop.load(Ordering::SeqCst)
    }

    /// Gate for every emission point: waits out a pause, errors on stop.
    pub fn checkpoint(&self) -> Result<(), Interrupted> {
        if self.stop_requested() {
            return Err(Interrupted);
        }
        if self.is_paused() {
            self.wait_for_resume()?;
        }
        Ok(())
    }

    /// Block until resume is requested, polling in bounded increments.
    ///
    /// Consumes the resume flag so a single resume signal unblocks exactly one
    /// wait.
    pub fn wait_for_resume(&self) -> Result<(), Interrupted> {
        while self.is_paused() && !self.resume_requested() {
            if self.stop_requested() {
                return Err(Interrupted);
            }
            thread::sleep(RESUME_POLL);
        }
        self.inner.resume_requested.store(false, Ordering::SeqCst);

        if self.stop_requested() {
            return Err(Interrupted);
        }
        Ok(())
    }

    /// Sleep in small increments, deferring to [`wait_for_resume`] on pause.
    ///
    /// A pause restarts the countdown from the full duration; elapsed
    /// pre-pause time is not credited.
    ///
    /// [`wait_for_resume`]: ReplayControls::wait_for_resume
    pub fn pausable_sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut start = Instant::now();
        loop {
            if self.stop_requested() {
                return Err(Interrupted);
            }
            if self.is_paused() {
                self.wait_for_resume()?;
                start = Instant::now();
                continue;
            }

            let elapsed = start.elapsed();
            if elapsed >= duration {
                return Ok(());
            }
            thread::sleep((duration - elapsed).min(SLEEP_STEP));
        }
    }
}
