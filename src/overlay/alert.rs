use crate::runtime::event::AlertEvent;
use crate::runtime::scheduler::Scheduler;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Fixed removal-animation window between an alert starting to exit and
/// actually leaving the list.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: Option<String>,
    pub heading: String,
    pub messages: Vec<String>,
    pub variant: AlertVariant,
    pub auto_focus: bool,
    pub timeout: Option<Duration>,
    pub content: Option<serde_json::Value>,
}

impl Alert {
    pub fn new(variant: AlertVariant, heading: impl Into<String>) -> Self {
        Self {
            id: None,
            heading: heading.into(),
            messages: Vec::new(),
            variant,
            auto_focus: false,
            timeout: None,
            content: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn auto_focus(mut self) -> Self {
        self.auto_focus = true;
        self
    }

    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(content);
        self
    }
}

/// Partial update applied to an existing alert. A present `timeout` field
/// clears and reschedules (or clears only, when `None`) the dismiss timer.
#[derive(Debug, Clone, Default)]
pub struct AlertPatch {
    pub heading: Option<String>,
    pub messages: Option<Vec<String>>,
    pub variant: Option<AlertVariant>,
    pub timeout: Option<Option<Duration>>,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AlertTask {
    CommitEnter(String),
    Expire(String),
    Remove(String),
}

/// Keyed collection of dismissable, auto-expiring notifications. Timers are
/// wall-clock based: each live timer keeps an absolute expiry instant, so
/// pause/resume accounts for real elapsed time across any number of cycles.
pub struct AlertCenter {
    alerts: IndexMap<String, Alert>,
    entering: IndexSet<String>,
    exiting: IndexSet<String>,
    expiries: HashMap<String, Instant>,
    paused: HashMap<String, Duration>,
    scheduler: Scheduler<AlertTask>,
    next_generated_id: u64,
}

impl Default for AlertCenter {
    fn default() -> Self {
        Self {
            alerts: IndexMap::new(),
            entering: IndexSet::new(),
            exiting: IndexSet::new(),
            expiries: HashMap::new(),
            paused: HashMap::new(),
            scheduler: Scheduler::new(),
            next_generated_id: 0,
        }
    }
}

impl AlertCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.alerts.contains_key(id)
    }

    pub fn is_entering(&self, id: &str) -> bool {
        self.entering.contains(id)
    }

    pub fn is_exiting(&self, id: &str) -> bool {
        self.exiting.contains(id)
    }

    /// Appends an alert and arms its auto-dismiss timer. Adding an id that
    /// already exists is a no-op returning the existing id.
    pub fn add(&mut self, alert: Alert, now: Instant) -> (String, Vec<AlertEvent>) {
        let id = match &alert.id {
            Some(id) => id.clone(),
            None => {
                self.next_generated_id += 1;
                format!("alert-{}", self.next_generated_id)
            }
        };

        if self.alerts.contains_key(&id) {
            return (id, vec![]);
        }

        let timeout = alert.timeout;
        self.alerts.insert(id.clone(), alert);
        self.entering.insert(id.clone());
        // Entering is a two-phase transition: cleared on the next tick so
        // the host can apply the enter animation class first.
        self.scheduler.emit_after(
            enter_key(&id),
            Duration::ZERO,
            AlertTask::CommitEnter(id.clone()),
            now,
        );

        if let Some(timeout) = timeout
            && timeout > Duration::ZERO
        {
            self.arm_timer(&id, timeout, now);
        }

        (id.clone(), vec![AlertEvent::Added { id }])
    }

    /// Starts the animated dismissal: the alert moves to the exiting set
    /// now and leaves the list once the animation window elapses.
    pub fn dismiss(&mut self, id: &str, now: Instant) -> Vec<AlertEvent> {
        if !self.alerts.contains_key(id) || self.exiting.contains(id) {
            return vec![];
        }

        self.disarm_timer(id);
        self.exiting.insert(id.to_string());
        self.scheduler.emit_after(
            remove_key(id),
            EXIT_ANIMATION,
            AlertTask::Remove(id.to_string()),
            now,
        );

        vec![AlertEvent::Exiting { id: id.to_string() }]
    }

    /// Immediate, non-animated full clear. Route navigation calls this.
    pub fn dismiss_all(&mut self) -> Vec<AlertEvent> {
        let had_any = !self.alerts.is_empty() || !self.exiting.is_empty();

        self.alerts.clear();
        self.entering.clear();
        self.exiting.clear();
        self.expiries.clear();
        self.paused.clear();
        self.scheduler.clear();

        if had_any { vec![AlertEvent::Cleared] } else { vec![] }
    }

    /// Cancels the live timer, capturing the remaining time for `resume`.
    pub fn pause_timer(&mut self, id: &str, now: Instant) {
        if let Some(expiry) = self.expiries.remove(id) {
            self.scheduler.cancel(&expire_key(id));
            self.paused
                .insert(id.to_string(), expiry.saturating_duration_since(now));
        }
    }

    /// Reschedules from the remainder captured at pause time.
    pub fn resume_timer(&mut self, id: &str, now: Instant) {
        if let Some(remaining) = self.paused.remove(id) {
            self.arm_timer(id, remaining, now);
        }
    }

    /// Merges a patch into an existing alert.
    pub fn update(&mut self, id: &str, patch: AlertPatch, now: Instant) {
        let Some(alert) = self.alerts.get_mut(id) else {
            return;
        };

        if let Some(heading) = patch.heading {
            alert.heading = heading;
        }
        if let Some(messages) = patch.messages {
            alert.messages = messages;
        }
        if let Some(variant) = patch.variant {
            alert.variant = variant;
        }
        if let Some(content) = patch.content {
            alert.content = Some(content);
        }
        if let Some(timeout) = patch.timeout {
            alert.timeout = timeout;
        }

        if let Some(timeout) = patch.timeout {
            self.disarm_timer(id);
            if let Some(timeout) = timeout
                && timeout > Duration::ZERO
            {
                self.arm_timer(id, timeout, now);
            }
        }
    }

    /// Advances timer-driven transitions: entering commits, expired alerts
    /// start exiting, exited alerts are removed.
    pub fn tick(&mut self, now: Instant) -> Vec<AlertEvent> {
        let mut events = Vec::new();
        for task in self.scheduler.drain_ready(now) {
            match task {
                AlertTask::CommitEnter(id) => {
                    if self.entering.shift_remove(&id) {
                        events.push(AlertEvent::Entered { id });
                    }
                }
                AlertTask::Expire(id) => {
                    events.extend(self.dismiss(&id, now));
                }
                AlertTask::Remove(id) => {
                    self.exiting.shift_remove(&id);
                    if self.alerts.shift_remove(&id).is_some() {
                        events.push(AlertEvent::Removed { id });
                    }
                }
            }
        }
        events
    }

    /// How long a host may wait before the next timer-driven transition.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }

    fn arm_timer(&mut self, id: &str, delay: Duration, now: Instant) {
        self.expiries.insert(id.to_string(), now + delay);
        self.scheduler
            .emit_after(expire_key(id), delay, AlertTask::Expire(id.to_string()), now);
    }

    fn disarm_timer(&mut self, id: &str) {
        self.scheduler.cancel(&expire_key(id));
        self.expiries.remove(id);
        self.paused.remove(id);
    }
}

fn enter_key(id: &str) -> String {
    format!("enter:{id}")
}

fn expire_key(id: &str) -> String {
    format!("expire:{id}")
}

fn remove_key(id: &str) -> String {
    format!("remove:{id}")
}
