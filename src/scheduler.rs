//! Deferred work. The session asks a `Scheduler` to run a `Task` after a delay;
//! when it expires the host hands the task back through `Session::fire`.

use crate::flow::Step;

/// Identifies a transient on-screen message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// The evasive button's settle window ended.
    SettleRelocation,
    DismissMessage(MessageId),
    ShowStep(Step),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TaskId;
    /// Cancelling an expired or unknown task is a no-op.
    fn cancel(&mut self, id: TaskId);
}

/// Virtual-clock scheduler. Time only moves when the owner advances it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    // (due, id, task); ids are monotonic so they break ties in schedule order.
    pending: Vec<(u64, TaskId, Task)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest task due at or before `until`, moving
    /// the clock to its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<Task> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= until)
            .min_by_key(|(_, (due, id, _))| (*due, id.0))
            .map(|(idx, _)| idx)?;
        let (due, _, task) = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }

    /// Move the clock to `until` without running anything.
    pub fn set_now(&mut self, until: u64) {
        self.now_ms = self.now_ms.max(until);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending
            .push((self.now_ms + u64::from(delay_ms), id, task));
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.pending.retain(|(_, pending_id, _)| *pending_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_pop_in_due_then_schedule_order() {
        let mut s = ManualScheduler::new();
        s.schedule(500, Task::SettleRelocation);
        s.schedule(100, Task::DismissMessage(MessageId(1)));
        s.schedule(100, Task::DismissMessage(MessageId(2)));
        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(1000), Some(Task::DismissMessage(MessageId(1))));
        assert_eq!(s.now_ms(), 100);
        assert_eq!(s.pop_due(1000), Some(Task::DismissMessage(MessageId(2))));
        assert_eq!(s.pop_due(1000), Some(Task::SettleRelocation));
        assert_eq!(s.pop_due(1000), None);
    }

    #[test]
    fn cancel_removes_pending_and_ignores_unknown() {
        let mut s = ManualScheduler::new();
        let id = s.schedule(10, Task::SettleRelocation);
        s.cancel(id);
        s.cancel(id);
        s.cancel(TaskId(999));
        assert_eq!(s.pending(), 0);
    }
}
