//! Dialogue Director - runs one interrogation turn end to end.
//!
//! Per turn:
//! 1. **Guard**: no backend or an empty utterance answers with a fixed line
//!    and is not recorded
//! 2. **Analyze**: the disclosure gate picks the facts the question may get,
//!    or refuses outright
//! 3. **Generate**: the prompt goes to the backend; a failure becomes a fixed
//!    apology
//! 4. **Sanitize**: the completion is cleaned into one character line
//! 5. **Record**: the turn is appended to memory and audited

mod audit;
mod backend;

pub use audit::*;
pub use backend::*;

use case_file::InvestigationState;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::DirectorConfig;
use crate::error::DirectorError;
use crate::knowledge_base::{DisclosureGate, KnowledgeBase, TopicMatcher};
use crate::memory::{ConversationMemory, DialogueTurn};
use crate::prompt::PromptBuilder;
use crate::sanitizer::ResponseSanitizer;

/// Reply to an empty or whitespace-only utterance.
pub const EMPTY_INPUT_REPLY: &str = "……何か仰ってくださいませんか。";

/// Reply when no generation backend is wired.
pub const CONFIGURATION_MISSING_REPLY: &str = "（エラー：生成バックエンドが未設定です）";

/// Reply when the generation backend fails.
pub const GENERATION_FAILURE_REPLY: &str =
    "……通信ではなく内部処理の問題のようですね。少し、困りました。";

/// Where the current (or last) turn is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnStage {
    #[default]
    Idle,
    AnalyzingRequest,
    Bypassed,
    Generating,
    Sanitizing,
    Recorded,
}

/// Which path a turn took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The backend answered and the reply was sanitized.
    Generated,
    /// The disclosure gate answered directly.
    Bypassed,
    EmptyInput,
    ConfigurationMissing,
    /// The backend failed; the fixed apology was used.
    GenerationFailed,
}

/// A finished turn with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: DialogueTurn,
    pub outcome: TurnOutcome,
    /// Whether the turn was appended to memory.
    pub recorded: bool,
}

/// Orchestrates gating, prompting, generation, and sanitizing for Sigure.
///
/// One turn is in flight at a time: `process_utterance` takes `&mut self`.
pub struct DialogueDirector {
    config: DirectorConfig,
    knowledge: Arc<KnowledgeBase>,
    memory: ConversationMemory,
    gate: DisclosureGate,
    prompt_builder: PromptBuilder,
    sanitizer: ResponseSanitizer,
    backend: Option<Box<dyn GenerationBackend>>,
    audit_sink: Option<Box<dyn AuditSink>>,

    stage: TurnStage,
    last_prompt: Option<String>,
    last_raw_response: Option<String>,
    last_dump_path: Option<PathBuf>,
    last_error: Option<DirectorError>,
}

impl DialogueDirector {
    /// Create a director without a backend.
    ///
    /// A file audit sink is installed when `config.audit.enabled` is set.
    pub fn new(config: DirectorConfig, knowledge: Arc<KnowledgeBase>) -> Self {
        let audit_sink: Option<Box<dyn AuditSink>> = if config.audit.enabled {
            Some(Box::new(FileAuditSink::from_config(&config.audit)))
        } else {
            None
        };

        Self {
            memory: ConversationMemory::new(config.context_turns),
            gate: DisclosureGate::new(config.disclosure_mode),
            prompt_builder: PromptBuilder::new(),
            sanitizer: ResponseSanitizer::new(),
            backend: None,
            audit_sink,
            config,
            knowledge,
            stage: TurnStage::Idle,
            last_prompt: None,
            last_raw_response: None,
            last_dump_path: None,
            last_error: None,
        }
    }

    /// Set the generation backend.
    pub fn with_backend(mut self, backend: impl GenerationBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Set the audit sink, replacing any configured one.
    pub fn with_audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit_sink = Some(Box::new(sink));
        self
    }

    /// Replace keyword topic matching.
    pub fn with_topic_matcher(mut self, matcher: impl TopicMatcher + 'static) -> Self {
        self.gate = DisclosureGate::new(self.config.disclosure_mode).with_matcher(matcher);
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    /// Prompt sent on the last generated turn.
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// Unprocessed backend output of the last generated turn.
    pub fn last_raw_response(&self) -> Option<&str> {
        self.last_raw_response.as_deref()
    }

    /// Path of the last audit dump, if the sink writes files.
    pub fn last_dump_path(&self) -> Option<&Path> {
        self.last_dump_path.as_deref()
    }

    /// Error behind the last degraded turn or failed audit, cleared at the
    /// start of each turn.
    pub fn last_error(&self) -> Option<&DirectorError> {
        self.last_error.as_ref()
    }

    /// Run one turn and return Sigure's reply.
    pub async fn process_utterance(
        &mut self,
        player_text: &str,
        state: &InvestigationState,
    ) -> DialogueTurn {
        self.process_utterance_detailed(player_text, state).await.turn
    }

    /// Run one turn and report which path it took.
    pub async fn process_utterance_detailed(
        &mut self,
        player_text: &str,
        state: &InvestigationState,
    ) -> TurnReport {
        self.stage = TurnStage::Idle;
        self.last_error = None;
        let player_text = player_text.trim();

        if self.backend.is_none() {
            warn!("Generation backend is not configured");
            self.last_error = Some(DirectorError::ConfigurationMissing);
            return unrecorded(player_text, CONFIGURATION_MISSING_REPLY, TurnOutcome::ConfigurationMissing);
        }

        if player_text.is_empty() {
            warn!("Empty utterance ignored");
            self.last_error = Some(DirectorError::EmptyInput);
            return unrecorded(player_text, EMPTY_INPUT_REPLY, TurnOutcome::EmptyInput);
        }

        self.stage = TurnStage::AnalyzingRequest;
        let transcript = self.memory.recent_transcript();
        let disclosure = self.gate.evaluate(player_text, state, &self.knowledge);

        if let Some(reply) = disclosure.direct_reply() {
            self.stage = TurnStage::Bypassed;
            debug!(reply, "Disclosure gate answered directly");
            let turn = DialogueTurn::new(player_text, reply);
            let recorded = self.config.record_bypass_turns;
            if recorded {
                self.memory.append(turn.clone());
                self.stage = TurnStage::Recorded;
            }
            return TurnReport {
                turn,
                outcome: TurnOutcome::Bypassed,
                recorded,
            };
        }

        self.stage = TurnStage::Generating;
        let prompt = self.prompt_builder.build(
            player_text,
            &transcript,
            state,
            disclosure.knowledge_block(),
        );
        debug!(phase = %state.phase(), chars = prompt.chars().count(), "Prompt built");
        self.last_prompt = Some(prompt.clone());

        let (raw_response, npc_text, outcome) = match self.generate(&prompt).await {
            Ok(raw) => {
                self.stage = TurnStage::Sanitizing;
                let clean = self.sanitizer.sanitize(&raw, &prompt);
                (Some(raw), clean, TurnOutcome::Generated)
            }
            Err(e) => {
                error!(error = %e, "Generation failed");
                self.last_error = Some(e);
                (
                    None,
                    GENERATION_FAILURE_REPLY.to_string(),
                    TurnOutcome::GenerationFailed,
                )
            }
        };
        self.last_raw_response = raw_response.clone();

        self.audit(TurnRecord {
            timestamp: Utc::now(),
            player_text: player_text.to_string(),
            transcript,
            prompt,
            raw_response,
            sanitized_response: npc_text.clone(),
        });

        let turn = DialogueTurn::new(player_text, npc_text);
        self.memory.append(turn.clone());
        self.stage = TurnStage::Recorded;

        TurnReport {
            turn,
            outcome,
            recorded: true,
        }
    }

    /// Start a new conversation: clear memory and the backend's own history.
    pub async fn reset(&mut self) {
        if let Some(backend) = self.backend.as_deref() {
            backend.clear_history().await;
        }
        self.memory.clear();
        self.stage = TurnStage::Idle;
        self.last_prompt = None;
        self.last_raw_response = None;
        self.last_error = None;
        info!("Conversation reset");
    }

    async fn generate(&self, prompt: &str) -> Result<String, DirectorError> {
        let backend = self
            .backend
            .as_deref()
            .ok_or(DirectorError::ConfigurationMissing)?;
        Ok(backend.generate(prompt).await?)
    }

    fn audit(&mut self, record: TurnRecord) {
        let Some(sink) = self.audit_sink.as_deref() else {
            return;
        };
        match sink.record(&record) {
            Ok(Some(path)) => self.last_dump_path = Some(path),
            Ok(None) => {}
            Err(e) => {
                let err = DirectorError::from(e);
                warn!(error = %err, "Audit record not written");
                // A generation failure on the same turn takes precedence
                self.last_error.get_or_insert(err);
            }
        }
    }
}

fn unrecorded(player_text: &str, reply: &str, outcome: TurnOutcome) -> TurnReport {
    TurnReport {
        turn: DialogueTurn::new(player_text, reply),
        outcome,
        recorded: false,
    }
}
