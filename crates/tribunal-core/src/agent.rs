use anyhow::Result;
use async_trait::async_trait;

use crate::{
    error::CourtError,
    types::{CaseRecord, Role, Statement, Thought, TurnRecord, Verdict},
};

/// Raw output of a generation tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub thought: String,
    pub evidence: Option<String>,
    pub section: Option<String>,
}

impl Generation {
    pub fn text(thought: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            ..Default::default()
        }
    }
}

/// A remote text-generation API (Gemini, OpenAI, ...).
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Generation>;
}

/// Which model capability a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Argument,
    Judgment,
    Verdict,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Argument => "generate_argument",
            Self::Judgment => "generate_judgment",
            Self::Verdict => "generate_verdict",
        }
    }
}

pub struct ModelRequest<'a> {
    pub role: Role,
    pub agent: &'a str,
    pub case: &'a CaseRecord,
    pub prompt: &'a str,
}

/// A locally hosted or pretrained model. Each capability is optional:
/// `Ok(None)` means the backend does not offer it and the caller moves on.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_argument(&self, _req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        Ok(None)
    }

    async fn generate_judgment(&self, _req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        Ok(None)
    }

    async fn generate_verdict(&self, _req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        Ok(None)
    }
}

/// Shared contract of every courtroom participant.
#[async_trait]
pub trait CourtAgent: Send {
    fn role(&self) -> Role;

    fn name(&self) -> &str;

    /// Plan the next turn. Never fails: provider errors degrade to heuristics.
    async fn think(&mut self, last_statement: Option<&str>) -> Thought;

    fn speak(&self, thought: &Thought) -> Statement;

    fn remember(&mut self, statement: &str, reasoning: &str);

    /// Another participant's statement as heard in court.
    fn observe(&mut self, _speaker: Role, _statement: &str) {}
}

/// The presiding participant: records both sides and renders the verdict.
#[async_trait]
pub trait Adjudicator: CourtAgent {
    fn record(&mut self, role: Role, statement: &str, reasoning: &str);

    /// Errors with `VerdictAlreadyRendered` on every call after the first.
    async fn render(&mut self, transcript: &[TurnRecord]) -> Result<Verdict, CourtError>;
}

// ── Memory ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub statement: String,
    pub reasoning: String,
}

/// Entries an agent keeps before the oldest is forgotten.
pub const MAX_MEMORY_ITEMS: usize = 10;

/// The agent's own recent statements, oldest first, capped at
/// [`MAX_MEMORY_ITEMS`].
#[derive(Debug, Clone, Default)]
pub struct Memory {
    entries: Vec<MemoryEntry>,
}

impl Memory {
    pub fn push(&mut self, statement: &str, reasoning: &str) {
        if self.entries.len() == MAX_MEMORY_ITEMS {
            self.entries.remove(0);
        }
        self.entries.push(MemoryEntry {
            statement: statement.to_string(),
            reasoning: reasoning.to_string(),
        });
    }

    pub fn recent(&self, n: usize) -> &[MemoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_forgets_the_oldest_past_the_cap() {
        let mut memory = Memory::default();
        for i in 0..MAX_MEMORY_ITEMS + 3 {
            memory.push(&format!("statement {i}"), "");
        }
        assert_eq!(memory.len(), MAX_MEMORY_ITEMS);
        assert_eq!(memory.recent(usize::MAX)[0].statement, "statement 3");
        assert_eq!(memory.recent(1)[0].statement, "statement 12");
    }
}
