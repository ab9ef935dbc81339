//! Clocks stamping facade telemetry.

use std::time::Instant;

/// Milliseconds elapsed since the facade was constructed.
pub trait TelemetryClock: Send + Sync {
    fn elapsed_ms(&self) -> u64;
}

/// Wall clock anchored at creation; never goes backwards.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryClock for MonotonicClock {
    fn elapsed_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualClock {
    now_ms: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn advance(&self, ms: u64) {
        self.now_ms
            .fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TelemetryClock for ManualClock {
    fn elapsed_ms(&self) -> u64 {
        self.now_ms.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.elapsed_ms();
        assert!(clock.elapsed_ms() >= first);
    }

    #[test]
    fn test_manual_clock_moves_only_on_advance() {
        let clock = ManualClock::default();
        assert_eq!(clock.elapsed_ms(), 0);
        clock.advance(250);
        assert_eq!(clock.elapsed_ms(), 250);
        assert_eq!(clock.elapsed_ms(), 250);
    }
}
