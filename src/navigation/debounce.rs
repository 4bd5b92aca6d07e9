use std::time::Duration;
use tokio::time::Instant;

/// Restart-on-activity timer with at most one pending deadline.
///
/// Time is passed in explicitly so owners can drive it from real clocks or from
/// recorded event timestamps.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer; any earlier deadline is replaced.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True exactly once when the deadline has passed; the timer is then disarmed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Search-as-you-type input that only yields a query once typing settles.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    timer: DebounceTimer,
    pending: Option<String>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: DebounceTimer::new(delay),
            pending: None,
        }
    }

    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some(query.trim().to_string());
        self.timer.restart(now);
    }

    /// The settled query, if the quiet period has elapsed since the last keystroke.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.timer.fire_if_due(now) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Take whatever is pending without waiting, e.g. when input ends.
    pub fn flush(&mut self) -> Option<String> {
        self.timer.cancel();
        self.pending.take()
    }

    /// Sleep until the current input settles and return it.
    pub async fn settled(&mut self) -> Option<String> {
        let deadline = self.timer.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.poll(Instant::now())
    }
}
