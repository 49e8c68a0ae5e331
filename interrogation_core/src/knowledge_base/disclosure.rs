//! Disclosure gate - decides which requested facts Sigure may reveal.
//!
//! Per requested topic, in request order:
//! 1. **Unknown**: no entry in the knowledge base, skipped
//! 2. **Phase gate**: entry needs Phase1+ but the investigation is at Phase0, skipped
//! 3. **Trust gate**: trust below the entry minimum; soft mode tells the
//!    generator to withhold it, strict mode refuses outright
//! 4. **Allowed**: the entry content goes into the knowledge block

use case_file::{InvestigationState, KnowledgeTopic};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{KnowledgeBase, QueryAnalyzer, TopicMatcher};

/// Fixed refusal when a requested fact is behind the trust gate (strict mode).
pub const TRUST_REFUSAL: &str = "……その件は黙秘します。";

/// Fixed refusal when topics were requested but none could be disclosed (strict mode).
pub const NO_DISCLOSURE_REFUSAL: &str = "……断定できません。";

/// How the gate handles facts it will not disclose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureMode {
    /// Keep the detective talking; the generator is told to withhold.
    #[default]
    Soft,
    /// Short-circuit with a canned refusal.
    Strict,
}

/// Outcome of the gate: a knowledge block for the prompt, or a direct reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisclosureResult {
    knowledge_block: String,
    direct_reply: Option<String>,
}

impl DisclosureResult {
    /// Nothing to add to the prompt.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Proceed to generation with the given knowledge block.
    pub fn with_block(knowledge_block: impl Into<String>) -> Self {
        Self {
            knowledge_block: knowledge_block.into(),
            direct_reply: None,
        }
    }

    /// Skip generation and answer with a fixed reply.
    pub fn bypass(reply: impl Into<String>) -> Self {
        Self {
            knowledge_block: String::new(),
            direct_reply: Some(reply.into()),
        }
    }

    /// Facts the generator may use. Possibly empty.
    pub fn knowledge_block(&self) -> &str {
        &self.knowledge_block
    }

    /// The player-visible reply when generation is bypassed.
    pub fn direct_reply(&self) -> Option<&str> {
        self.direct_reply.as_deref()
    }

    /// Whether the generation backend must not be called.
    pub fn should_bypass_generation(&self) -> bool {
        self.direct_reply.is_some()
    }
}

/// Filters requested topics against the investigation state.
pub struct DisclosureGate {
    mode: DisclosureMode,
    matcher: Box<dyn TopicMatcher>,
}

impl DisclosureGate {
    /// Create a gate using keyword topic matching.
    pub fn new(mode: DisclosureMode) -> Self {
        Self {
            mode,
            matcher: Box::new(QueryAnalyzer::new()),
        }
    }

    /// Replace the topic matcher.
    pub fn with_matcher(mut self, matcher: impl TopicMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn mode(&self) -> DisclosureMode {
        self.mode
    }

    /// Analyze the utterance and gate the topics it requests.
    pub fn evaluate(
        &self,
        utterance: &str,
        state: &InvestigationState,
        knowledge: &KnowledgeBase,
    ) -> DisclosureResult {
        let requested = self.matcher.requested_topics(utterance);
        debug!(topics = ?requested, "Requested knowledge topics");
        self.evaluate_topics(&requested, state, knowledge)
    }

    /// Gate an already-analyzed list of topics.
    pub fn evaluate_topics(
        &self,
        requested: &[KnowledgeTopic],
        state: &InvestigationState,
        knowledge: &KnowledgeBase,
    ) -> DisclosureResult {
        // No request is not a denial: generation proceeds without added facts
        if requested.is_empty() {
            return DisclosureResult::empty();
        }

        let phase = state.phase();
        let mut block = String::new();
        let mut any_allowed = false;

        for &topic in requested {
            let Some(entry) = knowledge.get(topic) else {
                debug!(%topic, "Topic has no knowledge entry");
                continue;
            };

            if entry.requires_phase1_plus && !phase.is_phase1_plus() {
                debug!(%topic, "Topic locked until Phase1");
                continue;
            }

            if state.trust() < entry.min_trust {
                debug!(%topic, trust = state.trust(), min_trust = entry.min_trust, "Trust too low");
                match self.mode {
                    DisclosureMode::Strict => return DisclosureResult::bypass(TRUST_REFUSAL),
                    DisclosureMode::Soft => {
                        block.push_str(&format!(
                            "- {}: （未開示：信頼条件未達のため黙秘すること）\n",
                            topic
                        ));
                        continue;
                    }
                }
            }

            any_allowed = true;
            block.push_str(&format!("- {}\n", entry.content));
        }

        if !any_allowed && self.mode == DisclosureMode::Strict {
            return DisclosureResult::bypass(NO_DISCLOSURE_REFUSAL);
        }

        DisclosureResult::with_block(block.trim())
    }
}

impl Default for DisclosureGate {
    fn default() -> Self {
        Self::new(DisclosureMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_file::{DiscoveryFlags, KnowledgeEntry};

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            KnowledgeEntry::new(KnowledgeTopic::BarthCorp, "バース社は買収を進めている。")
                .with_min_trust(50),
            KnowledgeEntry::new(KnowledgeTopic::SceneInterrogationRoom, "ここは取調室。"),
            KnowledgeEntry::new(KnowledgeTopic::Victim, "被害者は主人。").with_phase1_plus(),
        ])
        .unwrap()
    }

    fn state(trust: u8, murder_known: bool) -> InvestigationState {
        let flags = DiscoveryFlags {
            murder_truth_known: murder_known,
            ..Default::default()
        };
        InvestigationState::with_values(flags, trust, 0)
    }

    #[test]
    fn test_no_request_is_empty_without_bypass() {
        for mode in [DisclosureMode::Soft, DisclosureMode::Strict] {
            let result = DisclosureGate::new(mode).evaluate("君の名前は？", &state(0, false), &knowledge());

            assert_eq!(result, DisclosureResult::empty());
            assert!(!result.should_bypass_generation());
        }
    }

    #[test]
    fn test_trust_boundary_soft() {
        let gate = DisclosureGate::new(DisclosureMode::Soft);

        let below = gate.evaluate("バース社について", &state(49, false), &knowledge());
        assert!(!below.knowledge_block().contains("買収"));
        assert!(below.knowledge_block().contains("barth_corp"));
        assert!(below.knowledge_block().contains("黙秘"));
        assert!(!below.should_bypass_generation());

        let at = gate.evaluate("バース社について", &state(50, false), &knowledge());
        assert_eq!(at.knowledge_block(), "- バース社は買収を進めている。");
    }

    #[test]
    fn test_trust_boundary_strict() {
        let gate = DisclosureGate::new(DisclosureMode::Strict);

        let below = gate.evaluate("バース社について", &state(49, false), &knowledge());
        assert!(below.should_bypass_generation());
        assert_eq!(below.direct_reply(), Some(TRUST_REFUSAL));
        assert_eq!(below.knowledge_block(), "");

        let at = gate.evaluate("バース社について", &state(50, false), &knowledge());
        assert!(!at.should_bypass_generation());
    }

    #[test]
    fn test_strict_trust_refusal_stops_processing() {
        let gate = DisclosureGate::new(DisclosureMode::Strict);

        // Barth is checked before the scene topic and refuses immediately
        let result = gate.evaluate_topics(
            &[KnowledgeTopic::BarthCorp, KnowledgeTopic::SceneInterrogationRoom],
            &state(10, false),
            &knowledge(),
        );
        assert_eq!(result.direct_reply(), Some(TRUST_REFUSAL));
    }

    #[test]
    fn test_phase_gate() {
        let gate = DisclosureGate::new(DisclosureMode::Soft);

        let locked = gate.evaluate("被害者は誰だ", &state(100, false), &knowledge());
        assert_eq!(locked.knowledge_block(), "");
        assert!(!locked.should_bypass_generation());

        let open = gate.evaluate("被害者は誰だ", &state(0, true), &knowledge());
        assert_eq!(open.knowledge_block(), "- 被害者は主人。");

        // Later phases keep the topic open even without the murder flag
        let hidden_only = DiscoveryFlags {
            hidden_truth_known: true,
            ..Default::default()
        };
        let phase3 = InvestigationState::with_values(hidden_only, 0, 0);
        let open = gate.evaluate("被害者は誰だ", &phase3, &knowledge());
        assert_eq!(open.knowledge_block(), "- 被害者は主人。");
    }

    #[test]
    fn test_strict_denied_request_refuses() {
        let gate = DisclosureGate::new(DisclosureMode::Strict);

        // Requested, but phase-locked: distinct refusal from the trust one
        let result = gate.evaluate("被害者は誰だ", &state(100, false), &knowledge());
        assert_eq!(result.direct_reply(), Some(NO_DISCLOSURE_REFUSAL));

        // Requested, but unknown to the knowledge base
        let result = gate.evaluate("トモニって何", &state(100, false), &knowledge());
        assert_eq!(result.direct_reply(), Some(NO_DISCLOSURE_REFUSAL));
    }

    #[test]
    fn test_unknown_topic_skipped_silently_in_soft_mode() {
        let gate = DisclosureGate::new(DisclosureMode::Soft);

        let result = gate.evaluate("トモニって何", &state(100, false), &knowledge());
        assert_eq!(result, DisclosureResult::with_block(""));
    }

    #[test]
    fn test_mixed_block_keeps_request_order() {
        let gate = DisclosureGate::new(DisclosureMode::Soft);

        let result = gate.evaluate_topics(
            &[KnowledgeTopic::BarthCorp, KnowledgeTopic::SceneInterrogationRoom],
            &state(10, false),
            &knowledge(),
        );
        let lines: Vec<_> = result.knowledge_block().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("- barth_corp:"));
        assert_eq!(lines[1], "- ここは取調室。");
    }

    struct FixedMatcher(Vec<KnowledgeTopic>);

    impl TopicMatcher for FixedMatcher {
        fn requested_topics(&self, _text: &str) -> Vec<KnowledgeTopic> {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_matcher() {
        let gate = DisclosureGate::new(DisclosureMode::Soft)
            .with_matcher(FixedMatcher(vec![KnowledgeTopic::SceneInterrogationRoom]));

        let result = gate.evaluate("anything", &state(0, false), &knowledge());
        assert_eq!(result.knowledge_block(), "- ここは取調室。");
    }
}
