use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

new_key_type! {
    pub struct TimerId;
}

struct Pending {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Pending one-shot timers, fired in deadline order (ties in scheduling
/// order).
#[derive(Default)]
pub struct TimerQueue {
    pending: SlotMap<TimerId, Pending>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, callback: impl FnOnce() + 'static) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(Pending {
            deadline,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Unschedules `id` and hands its callback back, or `None` if it already
    /// fired or was cancelled. The caller drops the callback, so whatever it
    /// captured is released outside any borrow of the queue.
    pub fn cancel(&mut self, id: TimerId) -> Option<Box<dyn FnOnce()>> {
        self.pending.remove(id).map(|p| p.callback)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.pending.get(id).map(|p| p.deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes the earliest timer due at `now` and hands back its callback.
    /// The caller runs it, so no borrow of the queue is held meanwhile.
    pub fn take_due(&mut self, now: Instant) -> Option<(TimerId, Box<dyn FnOnce()>)> {
        let id = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .min_by_key(|(_, p)| (p.deadline, p.seq))
            .map(|(id, _)| id)?;
        self.pending.remove(id).map(|p| (id, p.callback))
    }
}
