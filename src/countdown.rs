use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Repeating one-second ticker owned by a session.
///
/// It is driven by the session clock rather than a thread of its own, so it
/// cannot outlive the session that created it. A cancelled countdown never
/// ticks again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    interval: Duration,
    carried: Duration,
    cancelled: bool,
}

impl Countdown {
    pub fn start() -> Self {
        Self::with_interval(TICK_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            carried: Duration::ZERO,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.carried = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled && !self.interval.is_zero()
    }

    /// Time until the next tick fires
    pub fn until_next_tick(&self) -> Duration {
        self.interval.saturating_sub(self.carried)
    }

    /// Feed elapsed time in; returns how many ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }

        self.carried += elapsed;
        let mut ticks = 0;
        while self.carried >= self.interval {
            self.carried -= self.interval;
            ticks += 1;
        }
        ticks
    }
}
