use crate::runtime::scheduler::{FrameRequest, FrameScheduler};

/// Observable state of the [`AnimationLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    /// Running; `pending` is the outstanding frame, `None` while a tick is
    /// in progress.
    Running { pending: Option<FrameRequest> },
}

/// Stopped → Running → Stopped state machine around a [`FrameScheduler`].
///
/// Exactly one frame is outstanding while running. A frame is accepted only
/// if its token matches the outstanding one; the next frame is requested
/// only after the current tick finished and only if the loop is still
/// running. Stopping is a single transition that cancels the outstanding
/// request, so a frame racing the stop can neither tick nor reschedule.
pub struct AnimationLoop {
    scheduler: Box<dyn FrameScheduler>,
    state: LoopState,
    ticks: u64,
}

impl AnimationLoop {
    #[must_use]
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            state: LoopState::Stopped,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// The outstanding frame token, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequest> {
        match self.state {
            LoopState::Running { pending } => pending,
            LoopState::Stopped => None,
        }
    }

    /// Number of frames accepted since start.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Requests the first frame. No-op unless stopped.
    pub fn start(&mut self) {
        if self.state == LoopState::Stopped {
            let request = self.scheduler.request_frame();
            self.state = LoopState::Running {
                pending: Some(request),
            };
        }
    }

    /// Accepts `request` if it is the outstanding frame.
    ///
    /// On success the loop is mid-tick until [`end_frame`](Self::end_frame).
    pub fn begin_frame(&mut self, request: FrameRequest) -> bool {
        match self.state {
            LoopState::Running { pending } if pending == Some(request) => {
                self.state = LoopState::Running { pending: None };
                self.ticks += 1;
                true
            }
            _ => false,
        }
    }

    /// Requests the next frame if still running and none is outstanding.
    pub fn end_frame(&mut self) {
        if let LoopState::Running { pending: None } = self.state {
            let request = self.scheduler.request_frame();
            self.state = LoopState::Running {
                pending: Some(request),
            };
        }
    }

    /// Cancels the outstanding frame and stops. Idempotent.
    ///
    /// Returns whether the loop was running.
    pub fn stop(&mut self) -> bool {
        match std::mem::replace(&mut self.state, LoopState::Stopped) {
            LoopState::Running { pending } => {
                if let Some(request) = pending {
                    self.scheduler.cancel_frame(request);
                }
                true
            }
            LoopState::Stopped => false,
        }
    }
}
