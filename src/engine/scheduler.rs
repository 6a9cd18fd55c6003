use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

struct Pending<T> {
    handle: TaskHandle,
    due: Duration,
    task: T,
}

/// Cancellable deferred tasks on the control thread.
///
/// Nothing here waits: the host calls [`Scheduler::pop_due`] from its tick
/// with the current time and handles whatever has come due. Tasks due at the
/// same instant come out in the order they were scheduled.
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_handle: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Pending { handle, due, task });
        handle
    }

    /// Remove a task before it fires. Returns it if it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let idx = self.pending.iter().position(|p| p.handle == handle)?;
        Some(self.pending.remove(idx).task)
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Take the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.handle.0))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).task)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
