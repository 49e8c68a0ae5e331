//! Conversation memory - the rolling transcript of completed exchanges.
//!
//! Storage is unbounded; only the read side is windowed, so the prompt sees
//! the last few turns while the full log stays available for export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::speaker::{ASKER_LABEL, CHARACTER_LABEL};

/// Number of recent turns included in the prompt by default.
pub const DEFAULT_CONTEXT_TURNS: usize = 6;

/// Unique identifier for dialogue turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    /// Create a new random turn ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed exchange: what the detective said and what Sigure answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    id: TurnId,
    player_text: String,
    npc_text: String,
    timestamp: DateTime<Utc>,
}

impl DialogueTurn {
    /// Create a turn stamped with the current UTC time.
    pub fn new(player_text: impl Into<String>, npc_text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            player_text: player_text.into(),
            npc_text: npc_text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn player_text(&self) -> &str {
        &self.player_text
    }

    pub fn npc_text(&self) -> &str {
        &self.npc_text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Ordered log of dialogue turns with a windowed transcript view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<DialogueTurn>,
    context_turns: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_TURNS)
    }
}

impl ConversationMemory {
    /// Create an empty memory that exposes the last `context_turns` turns.
    pub fn new(context_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            context_turns,
        }
    }

    /// Append a completed turn.
    pub fn append(&mut self, turn: DialogueTurn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    /// The last `context_turns` turns, oldest first.
    pub fn recent_turns(&self) -> &[DialogueTurn] {
        let start = self.turns.len().saturating_sub(self.context_turns);
        &self.turns[start..]
    }

    /// Format the recent window as alternating speaker lines.
    pub fn recent_transcript(&self) -> String {
        let mut transcript = String::new();
        for turn in self.recent_turns() {
            transcript.push_str(&format!("{} {}\n", ASKER_LABEL, turn.player_text));
            transcript.push_str(&format!("{} {}\n", CHARACTER_LABEL, turn.npc_text));
        }
        transcript.trim_end().to_string()
    }

    pub fn context_turns(&self) -> usize {
        self.context_turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Forget every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Export the full log as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.turns)
    }
}
