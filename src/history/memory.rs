use async_trait::async_trait;
use std::sync::Mutex;

use super::{ ConversationLog, ConversationLogEntry, HistoryError };

#[derive(Default)]
pub struct InMemoryConversationLog {
    entries: Mutex<Vec<ConversationLogEntry>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ConversationLogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|e| e.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, entry: ConversationLogEntry) -> Result<(), HistoryError> {
        self.entries
            .lock()
            .map_err(|_| HistoryError::Poisoned)?
            .push(entry);
        Ok(())
    }
}
