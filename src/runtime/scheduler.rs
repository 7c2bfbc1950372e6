//! Frame scheduling primitives.
//!
//! The engine never drives itself: it asks a host-provided
//! [`FrameScheduler`] for the next frame and the host calls
//! [`Engine::frame`](crate::Engine::frame) with the issued [`FrameRequest`]
//! when that frame is due. A request that is no longer pending (cancelled,
//! or superseded) is ignored by the engine.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Token identifying one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

/// Host frame-scheduling primitive (`requestAnimationFrame`, a redraw
/// request, a timer channel, ...).
pub trait FrameScheduler {
    /// Schedules one frame callback and returns its token.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancels a previously requested frame. Unknown tokens are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    queue: VecDeque<FrameRequest>,
    requested: u64,
    cancelled: u64,
}

/// Single-threaded scheduler driven explicitly by the host.
///
/// Requests queue up until the host takes them; clones share the same
/// queue, so a host can keep a handle while the engine owns another.
///
/// ```
/// use std::time::Instant;
///
/// use myth_viz::{Engine, EngineSettings, HeadlessContainer, ManualScheduler};
///
/// # fn main() -> myth_viz::Result<()> {
/// let scheduler = ManualScheduler::new();
/// let mut engine = Engine::new(
///     Box::new(HeadlessContainer::new(640, 480)),
///     Box::new(scheduler.clone()),
///     EngineSettings::default(),
/// )?;
///
/// for _ in 0..3 {
///     if let Some(request) = scheduler.take_pending() {
///         engine.frame(request, Instant::now())?;
///     }
/// }
/// assert_eq!(engine.frame_count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request, left in the queue.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.state.borrow().queue.front().copied()
    }

    /// Removes and returns the oldest outstanding request.
    #[must_use]
    pub fn take_pending(&self) -> Option<FrameRequest> {
        self.state.borrow_mut().queue.pop_front()
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Total number of requests ever issued.
    #[must_use]
    pub fn requested_count(&self) -> u64 {
        self.state.borrow().requested
    }

    /// Total number of requests cancelled while still outstanding.
    #[must_use]
    pub fn cancelled_count(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let request = FrameRequest(state.next_id);
        state.queue.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        if let Some(pos) = state.queue.iter().position(|&r| r == request) {
            state.queue.remove(pos);
            state.cancelled += 1;
        }
    }
}
