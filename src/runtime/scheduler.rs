use crate::runtime::event::AppEvent;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    /// Emits `event` after `delay`, superseding anything pending under `key`.
    Debounce {
        key: String,
        delay: Duration,
        event: AppEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    key: String,
    version: u64,
    event: AppEvent,
}

#[derive(Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::Debounce { key, delay, event } => {
                let version = self.bump_version(&key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    key,
                    version,
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
                self.delayed.retain(|task| task.key != key);
            }
        }
    }

    /// Removes and returns every due event whose key was not superseded.
    pub fn drain_ready(&mut self, now: Instant) -> Vec<AppEvent> {
        let mut ready = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.is_current(&task) {
                    ready.push(task.event);
                }
            } else {
                idx += 1;
            }
        }
        ready
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.delayed
            .iter()
            .map(|task| task.due_at.saturating_duration_since(now))
            .fold(default_timeout, Duration::min)
    }

    pub fn pending(&self) -> usize {
        self.delayed.len()
    }

    fn is_current(&self, task: &DelayedTask) -> bool {
        self.key_versions.get(&task.key).copied().unwrap_or(0) == task.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::command::Command;

    fn debounce(key: &str, ms: u64) -> SchedulerCommand {
        SchedulerCommand::Debounce {
            key: key.to_string(),
            delay: Duration::from_millis(ms),
            event: AppEvent::Command(Command::Tick),
        }
    }

    #[test]
    fn debounced_event_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(debounce("error", 100), start);

        assert!(scheduler.drain_ready(start).is_empty());
        assert_eq!(
            scheduler.poll_timeout(start, Duration::from_secs(1)),
            Duration::from_millis(100)
        );
        let ready = scheduler.drain_ready(start + Duration::from_millis(100));
        assert_eq!(ready.len(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn newer_debounce_supersedes_older() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(debounce("error", 100), start);
        scheduler.schedule(debounce("error", 100), start + Duration::from_millis(50));

        assert!(
            scheduler
                .drain_ready(start + Duration::from_millis(120))
                .is_empty()
        );
        assert_eq!(
            scheduler
                .drain_ready(start + Duration::from_millis(150))
                .len(),
            1
        );
    }

    #[test]
    fn cancel_drops_pending_event() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(debounce("error", 10), start);
        scheduler.schedule(debounce("other", 10), start);
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "error".to_string(),
            },
            start,
        );
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(
            scheduler
                .drain_ready(start + Duration::from_millis(10))
                .len(),
            1
        );
    }

    #[test]
    fn idle_scheduler_uses_default_timeout() {
        let scheduler = Scheduler::new();
        let timeout = scheduler.poll_timeout(Instant::now(), Duration::from_millis(120));
        assert_eq!(timeout, Duration::from_millis(120));
    }
}
