use std::collections::VecDeque;

use crate::remote::{ChangeBatch, ChangeEvent, Table};

/// Bounded, commit-ordered log of row changes.
pub(super) struct ChangeLog {
    capacity: usize,
    events: VecDeque<ChangeEvent>,
    /// Highest seq no longer retained; cursors below it must resync.
    pruned_through: u64,
}

impl ChangeLog {
    pub(super) fn new(capacity: usize, pruned_through: u64) -> Self {
        Self {
            capacity: capacity.max(1),
            events: VecDeque::new(),
            pruned_through,
        }
    }

    pub(super) fn push(&mut self, event: ChangeEvent) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            if let Some(dropped) = self.events.pop_front() {
                self.pruned_through = dropped.seq;
            }
        }
    }

    pub(super) fn read(
        &self,
        table: Option<Table>,
        since: u64,
        limit: usize,
        head: u64,
    ) -> ChangeBatch {
        if since < self.pruned_through || since > head {
            return ChangeBatch {
                events: Vec::new(),
                cursor: head,
                resync: true,
            };
        }

        let mut events: Vec<ChangeEvent> = Vec::new();
        let mut truncated_at = None;
        for ev in self.events.iter().filter(|e| e.seq > since) {
            if table.is_some_and(|t| t != ev.table) {
                continue;
            }
            if events.len() >= limit.max(1) {
                truncated_at = events.last().map(|e| e.seq);
                break;
            }
            events.push(ev.clone());
        }

        ChangeBatch {
            cursor: truncated_at.unwrap_or(head),
            events,
            resync: false,
        }
    }
}
