//! Investigation state - narrative progress of the interrogation.
//!
//! Discovery flags are the only authoritative data. The phase is never
//! stored; it is derived from the flags every time it is asked for.

use serde::{Deserialize, Serialize};

/// Upper bound of every 0-100 score (trust, progress, minimum trust).
pub const MAX_SCORE: u8 = 100;

/// Narrative stages of the interrogation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum InvestigationPhase {
    /// From the start until the detective establishes that Sigure killed the victim.
    #[default]
    Phase0,
    /// The killing is established; the motive is still hidden.
    Phase1,
    /// The motive is established; the fact Sigure herself does not know is still hidden.
    Phase2,
    /// Final stage, up to the ending branch.
    Phase3,
}

impl InvestigationPhase {
    /// Numeric index of the phase (0-3).
    pub fn index(self) -> u8 {
        match self {
            InvestigationPhase::Phase0 => 0,
            InvestigationPhase::Phase1 => 1,
            InvestigationPhase::Phase2 => 2,
            InvestigationPhase::Phase3 => 3,
        }
    }

    /// Whether the phase is past the opening stage.
    pub fn is_phase1_plus(self) -> bool {
        self >= InvestigationPhase::Phase1
    }
}

impl std::fmt::Display for InvestigationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase{}", self.index())
    }
}

/// Facts the detective has uncovered so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DiscoveryFlags {
    /// Sigure killed the victim.
    #[serde(default)]
    pub murder_truth_known: bool,
    /// Why she did it.
    #[serde(default)]
    pub motive_known: bool,
    /// The fact Sigure herself does not know.
    #[serde(default)]
    pub hidden_truth_known: bool,
}

impl DiscoveryFlags {
    /// Classify the flags into a phase, highest priority first.
    pub fn phase(&self) -> InvestigationPhase {
        if self.hidden_truth_known {
            InvestigationPhase::Phase3
        } else if self.motive_known {
            InvestigationPhase::Phase2
        } else if self.murder_truth_known {
            InvestigationPhase::Phase1
        } else {
            InvestigationPhase::Phase0
        }
    }
}

/// Progress of the investigation as seen by the interrogated character.
///
/// Owned by whatever drives the narrative; the dialogue pipeline only reads
/// it. Flags can only be set through this API, never cleared, so the
/// derived phase never regresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvestigationState {
    #[serde(default)]
    flags: DiscoveryFlags,

    /// Sigure's trust in the detective (0-100).
    #[serde(default)]
    trust: u8,

    /// Overall case progress (0-100).
    #[serde(default)]
    progress: u8,
}

impl InvestigationState {
    /// Create a fresh state: nothing discovered, no trust, no progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from explicit values, clamping scores to 0-100.
    pub fn with_values(flags: DiscoveryFlags, trust: u8, progress: u8) -> Self {
        Self {
            flags,
            trust: trust.min(MAX_SCORE),
            progress: progress.min(MAX_SCORE),
        }
    }

    /// Current phase, derived from the discovery flags.
    pub fn phase(&self) -> InvestigationPhase {
        self.flags.phase()
    }

    pub fn flags(&self) -> DiscoveryFlags {
        self.flags
    }

    pub fn trust(&self) -> u8 {
        self.trust
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Record that the detective established the killing.
    pub fn discover_murder_truth(&mut self) {
        self.flags.murder_truth_known = true;
    }

    /// Record that the detective established the motive.
    pub fn discover_motive(&mut self) {
        self.flags.motive_known = true;
    }

    /// Record that the detective uncovered the hidden truth.
    pub fn discover_hidden_truth(&mut self) {
        self.flags.hidden_truth_known = true;
    }

    /// Set trust, clamped to 0-100.
    pub fn set_trust(&mut self, trust: u8) {
        self.trust = trust.min(MAX_SCORE);
    }

    /// Adjust trust by a signed delta, saturating at both ends.
    pub fn adjust_trust(&mut self, delta: i16) {
        let next = (self.trust as i16)
            .saturating_add(delta)
            .clamp(0, MAX_SCORE as i16);
        self.trust = next as u8;
    }

    /// Set progress, clamped to 0-100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(MAX_SCORE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(murder: bool, motive: bool, hidden: bool) -> DiscoveryFlags {
        DiscoveryFlags {
            murder_truth_known: murder,
            motive_known: motive,
            hidden_truth_known: hidden,
        }
    }

    #[test]
    fn test_phase_priority_for_all_flag_combinations() {
        for bits in 0u8..8 {
            let (murder, motive, hidden) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let expected = if hidden {
                InvestigationPhase::Phase3
            } else if motive {
                InvestigationPhase::Phase2
            } else if murder {
                InvestigationPhase::Phase1
            } else {
                InvestigationPhase::Phase0
            };

            let state = InvestigationState::with_values(flags(murder, motive, hidden), 0, 0);
            assert_eq!(state.phase(), expected, "flags {:03b}", bits);
            // Unchanged flags always classify the same way
            assert_eq!(state.phase(), state.phase());
        }
    }

    #[test]
    fn test_phase_never_regresses_when_flags_are_set() {
        let mut state = InvestigationState::new();
        assert_eq!(state.phase(), InvestigationPhase::Phase0);

        state.discover_hidden_truth();
        assert_eq!(state.phase(), InvestigationPhase::Phase3);

        // Setting a lower-priority flag later keeps the higher phase
        state.discover_murder_truth();
        assert_eq!(state.phase(), InvestigationPhase::Phase3);
    }

    #[test]
    fn test_discovery_advances_phase() {
        let mut state = InvestigationState::new();

        state.discover_murder_truth();
        assert_eq!(state.phase(), InvestigationPhase::Phase1);

        state.discover_motive();
        assert_eq!(state.phase(), InvestigationPhase::Phase2);
        assert!(state.phase().is_phase1_plus());
    }

    #[test]
    fn test_scores_are_clamped() {
        let mut state = InvestigationState::with_values(DiscoveryFlags::default(), 150, 200);
        assert_eq!(state.trust(), 100);
        assert_eq!(state.progress(), 100);

        state.adjust_trust(-130);
        assert_eq!(state.trust(), 0);

        state.adjust_trust(45);
        assert_eq!(state.trust(), 45);

        state.set_progress(101);
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn test_adjust_trust_extreme_deltas() {
        let mut state = InvestigationState::with_values(DiscoveryFlags::default(), 100, 0);
        state.adjust_trust(i16::MAX);
        assert_eq!(state.trust(), 100);

        state.adjust_trust(i16::MIN);
        assert_eq!(state.trust(), 0);

        state.adjust_trust(i16::MIN);
        assert_eq!(state.trust(), 0);

        state.set_trust(1);
        state.adjust_trust(i16::MAX);
        assert_eq!(state.trust(), 100);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(InvestigationPhase::Phase0.to_string(), "Phase0");
        assert_eq!(InvestigationPhase::Phase2.index(), 2);
    }

    #[test]
    fn test_state_deserializes_with_defaults() {
        let state: InvestigationState =
            serde_json::from_str(r#"{"flags":{"motive_known":true},"trust":30}"#).unwrap();
        assert_eq!(state.phase(), InvestigationPhase::Phase2);
        assert_eq!(state.trust(), 30);
        assert_eq!(state.progress(), 0);
    }
}
