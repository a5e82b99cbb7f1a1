use std::collections::{BTreeMap, HashMap, VecDeque};

use drape_message::{Message, MessageKind, MessagePriority};

/// Fixed set of tiered queues (UberHighSingleton ≻ High ≻ Normal).
///
/// High and Normal are plain FIFO deques. The singleton tier keeps at most one
/// entry per kind: `uber` orders entries by insertion sequence and
/// `uber_slots` maps each kind to the sequence of its pending entry.
#[derive(Debug, Default)]
pub(crate) struct TierQueues {
    uber: BTreeMap<u64, Message>,
    uber_slots: HashMap<MessageKind, u64>,
    high: VecDeque<Message>,
    normal: VecDeque<Message>,
    next_seq: u64,
}

impl TierQueues {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            uber: BTreeMap::new(),
            uber_slots: HashMap::new(),
            high: VecDeque::with_capacity(capacity),
            normal: VecDeque::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.uber.is_empty() && self.high.is_empty() && self.normal.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.uber.len() + self.high.len() + self.normal.len()
    }

    /// Number of pending messages per tier ordered as [Uber, High, Normal].
    pub(crate) fn len_per_priority(&self) -> [usize; 3] {
        [self.uber.len(), self.high.len(), self.normal.len()]
    }

    /// Enqueues `message` at the back of its tier.
    ///
    /// For the singleton tier, returns the pending message of the same kind
    /// that the new one replaced.
    pub(crate) fn enqueue(&mut self, priority: MessagePriority, message: Message) -> Option<Message> {
        match priority {
            MessagePriority::Normal => {
                self.normal.push_back(message);
                None
            }
            MessagePriority::High => {
                self.high.push_back(message);
                None
            }
            MessagePriority::UberHighSingleton => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let stale = self
                    .uber_slots
                    .insert(message.kind(), seq)
                    .and_then(|old_seq| self.uber.remove(&old_seq));
                self.uber.insert(seq, message);
                stale
            }
        }
    }

    /// Pops the next message honoring tier order, FIFO within a tier.
    pub(crate) fn pop_next(&mut self) -> Option<Message> {
        if let Some((_, message)) = self.uber.pop_first() {
            self.uber_slots.remove(&message.kind());
            Some(message)
        } else if let Some(message) = self.high.pop_front() {
            Some(message)
        } else {
            self.normal.pop_front()
        }
    }

    /// Returns the most urgent tier that currently has messages.
    pub(crate) fn current_priority(&self) -> Option<MessagePriority> {
        MessagePriority::ALL
            .into_iter()
            .zip(self.len_per_priority())
            .find_map(|(priority, len)| (len > 0).then_some(priority))
    }

    /// Removes every pending message.
    pub(crate) fn drain_all(&mut self) -> Vec<Message> {
        self.uber_slots.clear();
        let mut out = Vec::with_capacity(self.len());
        out.extend(std::mem::take(&mut self.uber).into_values());
        out.extend(self.high.drain(..));
        out.extend(self.normal.drain(..));
        out
    }
}
