use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask<E> {
    due_at: Instant,
    guard: Guard,
    event: E,
}

/// Keyed delay scheduler. Every timer the orchestrators arm runs through
/// one of these: tasks carry an absolute due instant and a version guard,
/// so cancelling a key invalidates everything scheduled under it without
/// scanning the queue. `now` is always passed in by the caller, which keeps
/// timer behavior fully deterministic under test.
#[derive(Debug)]
pub struct Scheduler<E> {
    ready: VecDeque<E>,
    delayed: Vec<DelayedTask<E>>,
    key_versions: HashMap<String, u64>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            ready: VecDeque::new(),
            delayed: Vec::new(),
            key_versions: HashMap::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_now(&mut self, event: E) {
        self.ready.push_back(event);
    }

    /// Schedules `event` to become ready `delay` after `now`. A later
    /// `cancel` of the same key drops it.
    pub fn emit_after(&mut self, key: impl Into<String>, delay: Duration, event: E, now: Instant) {
        let key = key.into();
        let version = *self.key_versions.entry(key.clone()).or_insert(0);
        self.delayed.push(DelayedTask {
            due_at: now + delay,
            guard: Guard { key, version },
            event,
        });
    }

    pub fn cancel(&mut self, key: &str) {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.ready.clear();
        self.delayed.clear();
        self.key_versions.clear();
    }

    /// Moves every due, still-valid task into the ready queue and drains it.
    pub fn drain_ready(&mut self, now: Instant) -> Vec<E> {
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    self.ready.push_back(task.event);
                }
            } else {
                idx += 1;
            }
        }

        self.ready.drain(..).collect()
    }

    /// How long a host event loop may sleep before the next task is due.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        if !self.ready.is_empty() {
            return Duration::ZERO;
        }

        let mut next = default_timeout;
        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }

    fn task_is_valid(&self, task: &DelayedTask<E>) -> bool {
        let current = *self.key_versions.get(&task.guard.key).unwrap_or(&0);
        current == task.guard.version
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use std::time::{Duration, Instant};

    #[test]
    fn delayed_task_fires_once_due() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.emit_after("t", Duration::from_millis(100), 1u32, start);

        assert!(scheduler.drain_ready(start).is_empty());
        assert!(
            scheduler
                .drain_ready(start + Duration::from_millis(99))
                .is_empty()
        );
        assert_eq!(
            scheduler.drain_ready(start + Duration::from_millis(100)),
            vec![1]
        );
        assert!(
            scheduler
                .drain_ready(start + Duration::from_millis(200))
                .is_empty()
        );
    }

    #[test]
    fn cancel_invalidates_pending_key() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.emit_after("t", Duration::from_millis(50), 1u32, start);
        scheduler.cancel("t");
        scheduler.emit_after("t", Duration::from_millis(50), 2u32, start);

        assert_eq!(
            scheduler.drain_ready(start + Duration::from_millis(50)),
            vec![2]
        );
    }

    #[test]
    fn zero_delay_becomes_ready_on_next_drain() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.emit_after("enter", Duration::ZERO, "commit", start);
        assert_eq!(scheduler.drain_ready(start), vec!["commit"]);
    }

    #[test]
    fn poll_timeout_tracks_nearest_deadline() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.emit_after("a", Duration::from_millis(300), 1u32, start);
        scheduler.emit_after("b", Duration::from_millis(120), 2u32, start);

        assert_eq!(
            scheduler.poll_timeout(start, Duration::from_secs(1)),
            Duration::from_millis(120)
        );
    }
}
