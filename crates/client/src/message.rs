//! Message log primitives for the headless client.
use std::collections::VecDeque;

/// Severity level for messages produced from runtime events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntry {
    pub text: String,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageLevel::Info)
    }
}

/// Circular buffer of the most recent messages.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn count(&self, level: MessageLevel) -> usize {
        self.entries.iter().filter(|entry| entry.level == level).count()
    }
}
