use std::thread::sleep;
use std::time::{Duration, Instant};

/// Tracks the minimum wall-clock delay that must elapse before the next
/// DDC/CI transaction on a [`crate::Device`] is allowed to start.
///
/// A monitor's firmware misbehaves if commands arrive faster than its
/// documented quiet period, so every framed write/read arms this with the
/// delay the wire format requires, and the next framed operation waits it
/// out before doing anything else.
#[derive(Clone, Debug, Default)]
pub(crate) struct Delay {
    since: Option<Instant>,
    required: Duration,
}

impl Delay {
    /// Starts (or restarts) the quiet period, counting from now.
    pub(crate) fn arm(&mut self, required: Duration) {
        self.since = Some(Instant::now());
        self.required = required;
    }

    /// Blocks until the armed quiet period has fully elapsed. A no-op if
    /// nothing is armed, or if it already has.
    pub(crate) fn wait(&mut self) {
        if let Some(since) = self.since.take() {
            if let Some(remaining) = self.required.checked_sub(since.elapsed()) {
                sleep(remaining);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_without_arm_is_instant() {
        let mut delay = Delay::default();
        let start = Instant::now();
        delay.wait();
        assert!(start.elapsed() < Duration::from_millis(5));
    }

    #[test]
    fn wait_is_idempotent() {
        let mut delay = Delay::default();
        delay.arm(Duration::from_millis(5));
        delay.wait();
        let start = Instant::now();
        delay.wait();
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
