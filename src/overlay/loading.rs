use crate::runtime::event::LoadingEvent;
use crate::runtime::scheduler::Scheduler;
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Minimum time the overlay stays up once shown, so a fast request does
/// not flash it.
pub const MIN_VISIBLE: Duration = Duration::from_millis(1000);

const CLOSE_KEY: &str = "close";

#[derive(Debug, Clone)]
struct LoadingEntry {
    message: Option<String>,
    since: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadingTask {
    Close,
}

/// Reference-counted overlay visibility controller. Each in-flight piece of
/// work holds one entry; the overlay is up while any entry exists, and a
/// single cancellable pending-close task enforces the minimum visible
/// duration when the last entry leaves early.
pub struct LoadingScreen {
    items: IndexMap<String, LoadingEntry>,
    visible: bool,
    visible_since: Option<Instant>,
    message: Option<String>,
    scheduler: Scheduler<LoadingTask>,
    next_generated_id: u64,
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            visible: false,
            visible_since: None,
            message: None,
            scheduler: Scheduler::new(),
            next_generated_id: 0,
        }
    }
}

impl LoadingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn entry_count(&self) -> usize {
        self.items.len()
    }

    /// In-flight entries with the instant each was registered.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Instant, Option<&str>)> {
        self.items
            .iter()
            .map(|(id, entry)| (id.as_str(), entry.since, entry.message.as_deref()))
    }

    /// Registers one piece of in-flight work. The first concurrent entry
    /// records the visibility timestamp and cancels any pending close; the
    /// displayed message always follows the most recently added entry.
    pub fn set(
        &mut self,
        id: Option<String>,
        message: Option<String>,
        now: Instant,
    ) -> (String, Vec<LoadingEvent>) {
        let id = id.unwrap_or_else(|| {
            self.next_generated_id += 1;
            format!("loading-{}", self.next_generated_id)
        });

        let mut events = Vec::new();

        if self.items.is_empty() {
            self.visible_since = Some(now);
            self.scheduler.cancel(CLOSE_KEY);
        }
        if !self.visible {
            self.visible = true;
            events.push(LoadingEvent::Shown);
        }

        self.items.insert(
            id.clone(),
            LoadingEntry {
                message: message.clone(),
                since: now,
            },
        );

        if self.message != message {
            self.message = message.clone();
            events.push(LoadingEvent::MessageChanged { message });
        }

        (id, events)
    }

    /// Removes one entry, or every entry when no id is given. When the set
    /// empties, the overlay closes immediately if the minimum visible
    /// duration has elapsed, otherwise after the remaining time.
    pub fn dismiss(&mut self, id: Option<&str>, now: Instant) -> Vec<LoadingEvent> {
        match id {
            Some(id) => {
                if self.items.shift_remove(id).is_none() {
                    return vec![];
                }
            }
            None => {
                if self.items.is_empty() {
                    return vec![];
                }
                self.items.clear();
            }
        }

        let mut events = Vec::new();

        if self.items.is_empty() {
            let elapsed = self
                .visible_since
                .map(|since| now.saturating_duration_since(since))
                .unwrap_or(MIN_VISIBLE);

            if elapsed >= MIN_VISIBLE {
                events.extend(self.close());
            } else {
                // Always cancel before arming: at most one pending close.
                self.scheduler.cancel(CLOSE_KEY);
                self.scheduler
                    .emit_after(CLOSE_KEY, MIN_VISIBLE - elapsed, LoadingTask::Close, now);
            }
        } else {
            let last_message = self
                .items
                .last()
                .and_then(|(_, entry)| entry.message.clone());
            if self.message != last_message {
                self.message = last_message.clone();
                events.push(LoadingEvent::MessageChanged {
                    message: last_message,
                });
            }
        }

        events
    }

    /// Fires the pending close once its deadline passes.
    pub fn tick(&mut self, now: Instant) -> Vec<LoadingEvent> {
        let mut events = Vec::new();
        for task in self.scheduler.drain_ready(now) {
            match task {
                LoadingTask::Close => {
                    if self.items.is_empty() {
                        events.extend(self.close());
                    }
                }
            }
        }
        events
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }

    fn close(&mut self) -> Vec<LoadingEvent> {
        if !self.visible {
            return vec![];
        }
        self.visible = false;
        self.visible_since = None;
        let mut events = Vec::new();
        if self.message.take().is_some() {
            events.push(LoadingEvent::MessageChanged { message: None });
        }
        events.push(LoadingEvent::Hidden);
        events
    }
}
