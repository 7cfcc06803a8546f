//! Explicit timer scheduling
//!
//! Timers are polled with a caller-supplied `Instant` instead of sleeping, so
//! the main loop can drive them from the terminal event poll and tests can
//! drive them with synthetic time.

use std::time::{Duration, Instant};

/// Handle returned by `schedule`; pass it to `cancel` to stop the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    token: CancelToken,
    interval: Duration,
    deadline: Instant,
    tick: T,
}

/// Shortest period a timer may have; a zero interval would fire on every poll
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Repeating timers that yield a `tick` value each time they come due
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    timers: Vec<Timer<T>>,
    frame_interval: Duration,
    next_token: u64,
}

impl<T: Copy> Scheduler<T> {
    /// Create a scheduler whose frame timers fire every `frame_interval`
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            timers: Vec::new(),
            frame_interval,
            next_token: 0,
        }
    }

    /// Fire `tick` every `interval`, first at `now + interval`
    pub fn schedule(&mut self, now: Instant, interval: Duration, tick: T) -> CancelToken {
        let interval = interval.max(MIN_INTERVAL);
        let token = CancelToken(self.next_token);
        self.next_token += 1;
        self.timers.push(Timer {
            token,
            interval,
            deadline: now + interval,
            tick,
        });
        token
    }

    /// Fire `tick` at the display refresh rate
    pub fn schedule_frame(&mut self, now: Instant, tick: T) -> CancelToken {
        self.schedule(now, self.frame_interval, tick)
    }

    /// Stop a timer. Returns false if it was already gone.
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.token != token);
        self.timers.len() != before
    }

    #[allow(dead_code)]
    pub fn is_scheduled(&self, token: CancelToken) -> bool {
        self.timers.iter().any(|timer| timer.token == token)
    }

    pub fn interval_of(&self, token: CancelToken) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.token == token)
            .map(|timer| timer.interval)
    }

    /// Earliest pending deadline, if any timer is live
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.deadline).min()
    }

    /// Collect the ticks of every timer due at `now`, earliest first.
    ///
    /// A late timer fires once, not once per missed interval; its next
    /// deadline is kept on its original cadence when that is still ahead
    /// and otherwise pushed to `now + interval`.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        let mut due: Vec<(Instant, T)> = Vec::new();
        for timer in &mut self.timers {
            if timer.deadline > now {
                continue;
            }
            due.push((timer.deadline, timer.tick));
            let next = timer.deadline + timer.interval;
            timer.deadline = if next > now { next } else { now + timer.interval };
        }
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, tick)| tick).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(FRAME);
        scheduler.schedule(start, ms(100), 'g');

        assert!(scheduler.poll(start + ms(99)).is_empty());
        assert_eq!(scheduler.poll(start + ms(100)), vec!['g']);
        assert!(scheduler.poll(start + ms(150)).is_empty());
        assert_eq!(scheduler.poll(start + ms(200)), vec!['g']);
    }

    #[test]
    fn test_zero_interval_waits_between_polls() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(FRAME);
        scheduler.schedule(start, Duration::ZERO, 'g');

        assert!(scheduler.poll(start).is_empty());
        assert_eq!(scheduler.poll(start + ms(1)), vec!['g']);
        assert!(scheduler.poll(start + ms(1)).is_empty());
    }

    #[test]
    fn test_late_poll_fires_once() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(FRAME);
        scheduler.schedule(start, ms(100), 'g');

        assert_eq!(scheduler.poll(start + ms(1000)), vec!['g']);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(1100)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(FRAME);
        let token = scheduler.schedule(start, ms(100), 'g');

        assert!(scheduler.is_scheduled(token));
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(scheduler.poll(start + ms(500)).is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_frame_and_interval_ordering() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(FRAME);
        scheduler.schedule(start, ms(10), 'g');
        let frame = scheduler.schedule_frame(start, 'f');

        assert_eq!(scheduler.interval_of(frame), Some(FRAME));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(10)));
        assert_eq!(scheduler.poll(start + ms(16)), vec!['g', 'f']);
    }
}
