use serde::Serialize;
use thiserror::Error;

/// Text shown in place of an answer that has not arrived yet.
pub const PENDING_TEXT: &str = "Yanıt aranıyor...";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Answer {
    Pending,
    Resolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub question: String,
    pub answer: Answer,
}

impl ConversationEntry {
    pub fn answer_text(&self) -> &str {
        match &self.answer {
            Answer::Pending => PENDING_TEXT,
            Answer::Resolved(text) => text,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.answer, Answer::Pending)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("no conversation entry {0:?}")]
    UnknownEntry(EntryId),
    #[error("conversation entry {0:?} already has an answer")]
    AlreadyResolved(EntryId),
}

/// Append-only question/answer log. Each answer is filled in exactly once, addressed by
/// the entry's id rather than its position.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pending(&mut self, question: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(ConversationEntry {
            id,
            question: question.into(),
            answer: Answer::Pending,
        });
        id
    }

    pub fn resolve(&mut self, id: EntryId, answer: impl Into<String>) -> Result<(), ConversationError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ConversationError::UnknownEntry(id))?;
        if !entry.is_pending() {
            return Err(ConversationError::AlreadyResolved(id));
        }
        entry.answer = Answer::Resolved(answer.into());
        Ok(())
    }

    pub fn get(&self, id: EntryId) -> Option<&ConversationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
