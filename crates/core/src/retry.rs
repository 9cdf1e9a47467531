/// Deferred rechecks allowed while waiting for the render pipeline after a reload.
pub const MAX_STARTUP_ATTEMPTS: u32 = 5;

/// Schedules another poll on a later tick of the host event loop.
pub trait Scheduler {
    fn defer(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    Ready,
    RetryLater,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Waiting { attempt: u32 },
    Ready,
    Exhausted,
}

/// Polls a readiness condition once immediately and then up to `max_attempts` more times.
#[derive(Debug, Clone)]
pub struct BoundedRetry {
    max_attempts: u32,
    state: RetryState,
}

impl BoundedRetry {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            state: RetryState::Waiting { attempt: 0 },
        }
    }

    /// Index of the next check, or of the check that settled the retry.
    pub fn attempt(&self) -> Option<u32> {
        match self.state {
            RetryState::Waiting { attempt } => Some(attempt),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RetryState::Waiting { .. })
    }

    pub fn poll(&mut self, ready: bool) -> RetryStep {
        let attempt = match self.state {
            RetryState::Ready => return RetryStep::Ready,
            RetryState::Exhausted => return RetryStep::Exhausted,
            RetryState::Waiting { attempt } => attempt,
        };
        if ready {
            self.state = RetryState::Ready;
            RetryStep::Ready
        } else if attempt < self.max_attempts {
            self.state = RetryState::Waiting {
                attempt: attempt + 1,
            };
            RetryStep::RetryLater
        } else {
            self.state = RetryState::Exhausted;
            RetryStep::Exhausted
        }
    }
}
