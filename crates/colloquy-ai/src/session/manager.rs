//! Session struct and transcript management.

use colloquy_common::SessionId;
use tracing::debug;

use crate::usage::UsageTracker;
use crate::{CompletionRequest, HistoryConfig, Persona, Turn};

use super::types::TurnState;

/// One conversation: the transcript plus the state of the turn in flight.
///
/// The caller owns the session and passes it by `&mut` into each turn, so
/// at most one turn can run at a time.
#[derive(Debug)]
pub struct Session {
    pub(super) id: SessionId,
    /// Committed turns, oldest first.
    pub(super) transcript: Vec<Turn>,
    /// What `reset` restores.
    pub(super) seed: Vec<Turn>,
    pub(super) history: HistoryConfig,
    pub(super) state: TurnState,
    pub(super) usage: UsageTracker,
}

impl Session {
    /// An empty session with no greeting.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            transcript: Vec::new(),
            seed: Vec::new(),
            history: HistoryConfig::Full,
            state: TurnState::Idle,
            usage: UsageTracker::new(),
        }
    }

    /// Seed the transcript with an assistant greeting. Blank greetings are ignored.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        self.seed = if greeting.trim().is_empty() {
            Vec::new()
        } else {
            vec![Turn::assistant(greeting)]
        };
        self.transcript = self.seed.clone();
        self
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn seed_len(&self) -> usize {
        self.seed.len()
    }

    /// State of the most recent turn; `Idle` before the first turn and after `reset`.
    pub fn last_state(&self) -> TurnState {
        self.state
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub fn history(&self) -> HistoryConfig {
        self.history
    }

    /// Restore the seeded transcript. Usage totals survive a reset.
    pub fn reset(&mut self) {
        debug!(session = %self.id, turns = self.transcript.len(), "resetting session");
        self.transcript.clone_from(&self.seed);
        self.state = TurnState::Idle;
    }

    /// The request a turn would send right now: persona instruction plus the
    /// transcript, trimmed by the history policy.
    pub fn build_request(&self, persona: &Persona) -> CompletionRequest {
        let turns = match self.history {
            HistoryConfig::Full => self.transcript.clone(),
            HistoryConfig::LastTurns(n) => {
                let seed_len = self.seed.len().min(self.transcript.len());
                let (seed, rest) = self.transcript.split_at(seed_len);
                let keep_from = rest.len().saturating_sub(n);
                seed.iter().chain(&rest[keep_from..]).cloned().collect()
            }
        };
        CompletionRequest {
            system_instruction: persona.system_prompt.to_string(),
            turns,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
