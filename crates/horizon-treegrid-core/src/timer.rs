//! Timer system for Horizon TreeGrid.
//!
//! One-shot timers for delays such as the drag hover auto-expand. The grid has
//! no event loop of its own, so every operation takes the current [`Instant`]
//! from the caller; the host pumps the grid from its frame or tick callback,
//! and tests drive time forward explicitly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// One-shot timers against caller-supplied time.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// Fire time of every pending timer.
    timers: SlotMap<TimerId, Instant>,
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_time = now + duration;
        let id = self.timers.insert(fire_time);
        self.queue.push(TimerQueueEntry { id, fire_time });
        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer started");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns an error if the timer was not found (already fired or stopped).
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => Ok(()),
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Remove queue entries whose timers were stopped.
    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Fire every timer due at or before `now`.
    ///
    /// Returns the IDs of the timers that fired, in fire-time order.
    #[tracing::instrument(skip(self), target = "horizon_treegrid_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();
            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }
        fired
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_deadline() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let id = timers.start_one_shot(t0, Duration::from_millis(500));

        assert!(timers.process_expired(t0 + Duration::from_millis(499)).is_empty());
        assert_eq!(timers.process_expired(t0 + Duration::from_millis(500)), vec![id]);
        assert!(!timers.is_active(id));
        assert!(timers.process_expired(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let id = timers.start_one_shot(t0, Duration::from_millis(100));

        assert!(timers.stop(id).is_ok());
        assert!(timers.stop(id).is_err());
        assert!(timers.process_expired(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.time_until_next(t0), None);
    }

    #[test]
    fn test_fire_order_follows_deadlines() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let late = timers.start_one_shot(t0, Duration::from_millis(300));
        let early = timers.start_one_shot(t0, Duration::from_millis(100));

        assert_eq!(timers.time_until_next(t0), Some(Duration::from_millis(100)));
        assert_eq!(timers.process_expired(t0 + Duration::from_secs(1)), vec![early, late]);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_time_until_next_skips_stopped_timers() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let hover = timers.start_one_shot(t0, Duration::from_millis(50));
        timers.start_one_shot(t0, Duration::from_millis(500));

        timers.stop(hover).unwrap();
        assert_eq!(timers.time_until_next(t0 + Duration::from_millis(100)), Some(Duration::from_millis(400)));
        assert_eq!(
            timers.time_until_next(t0 + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
