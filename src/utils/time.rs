#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Frame timer.
///
/// Starts lazily on the first tick, so the first frame always reports a zero
/// delta regardless of how long the engine waited before it was scheduled.
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Option<Instant>,
    last_update: Option<Instant>,
    /// Time since last tick, after clamping
    pub delta: Duration,
    /// Total elapsed time since the first tick
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
    max_delta: Option<Duration>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: None,
            last_update: None,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: None,
        }
    }

    /// Timer whose deltas never exceed `max_delta_seconds`.
    ///
    /// Negative or non-finite bounds leave deltas unclamped.
    #[must_use]
    pub fn with_max_delta(max_delta_seconds: f32) -> Self {
        let mut timer = Self::new();
        timer.max_delta = Duration::try_from_secs_f32(max_delta_seconds).ok();
        timer
    }

    /// Advances the timer to `now` and returns the (clamped) delta in seconds.
    ///
    /// Timestamps earlier than the previous tick yield a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let start = *self.start_time.get_or_insert(now);
        let raw = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));

        self.delta = match self.max_delta {
            Some(max) if raw > max => {
                log::debug!(
                    "Frame delta {:.3}s clamped to {:.3}s",
                    raw.as_secs_f32(),
                    max.as_secs_f32()
                );
                max
            }
            _ => raw,
        };
        self.elapsed = now.saturating_duration_since(start);
        self.last_update = Some(now);
        self.frame_count += 1;

        self.delta.as_secs_f32()
    }

    /// Advances the timer to the current instant.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
