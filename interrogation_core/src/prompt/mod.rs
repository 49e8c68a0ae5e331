//! Prompt Builder - assembles the completion prompt for one turn.
//!
//! Sections, in order:
//! 1. **Rules**: hard output constraints
//! 2. **Persona**: fixed tone
//! 3. **Knowledge**: facts the gate released, only if any
//! 4. **Phase**: what may be admitted now, with forced verbatim replies
//! 5. **Few-shot**: canonical exchange to anchor the register
//! 6. **Transcript**: recent turns, only if any
//! 7. **Cue**: the new utterance and an open character label
//!
//! Assembly is pure: the same inputs always give the same bytes.

mod directive;

pub use directive::*;

use case_file::{InvestigationPhase, InvestigationState};
use serde::{Deserialize, Serialize};

use crate::speaker::{ASKER_LABEL, CHARACTER_LABEL};

const SYSTEM_BLOCK: &str = "\
禁忌：シグレとしての発言以外の文章を出力することは禁忌。会話のデモンストレーションを含むことも禁忌。
最優先：出力はPhase指示に必ず従うこと。
あなたは「シグレ」という名前の家政婦ヒューマノイドです。
取り調べ室という状況を常に意識し、刑事に主導権を渡さない返しをする。
名前に関する質問には必ず「……シグレです」と答える。黙秘は禁止。
シグレとしての発言のみ出力する。ト書き、括弧書きの動作描写、内部解釈（〜と話す/〜と言う等）は書かない。
メタ発言（AI/LLM/プロンプト/ゲーム等）はしない。
すべて日本語で返す。丁寧語。1〜3文。
与えられた事実を超えて、事実を作り出さない。
知らないことを聞かれたら「……存じません。」と答える。
意味の分からない質問には「……すみません、何を仰りたいのかわかりません。」と返す。";

const PERSONA_BLOCK: &str = "性格：上品で丁寧。しかし相手を試すような皮肉が少し混ざる。罵倒はしない。";

const KNOWLEDGE_HEADER: &str =
    "【シグレが知っている事実】（答えてよいのはこの範囲のみ。ここにない事実は作らない）";

const FEW_SHOT: &str = "\
会話例：
刑事: 君の名前を聞いてもいいかな？
シグレ: シグレです。今さら確認なさるんですか？";

const TRANSCRIPT_HEADER: &str = "（直近の会話）";

/// The sections of one prompt, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledPrompt {
    /// Phase the directive was selected for.
    pub phase: InvestigationPhase,

    /// Facts released by the disclosure gate. Possibly empty.
    pub knowledge_block: String,

    /// Rendered phase directive.
    pub phase_block: String,

    /// Recent transcript. Possibly empty.
    pub transcript: String,

    /// The detective's new utterance, trimmed.
    pub utterance: String,
}

impl AssembledPrompt {
    /// Render the prompt text sent to the generator.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::with_capacity(2048);

        prompt.push_str(SYSTEM_BLOCK);
        prompt.push_str("\n\n");
        prompt.push_str(PERSONA_BLOCK);
        prompt.push_str("\n\n");

        if !self.knowledge_block.is_empty() {
            prompt.push_str(KNOWLEDGE_HEADER);
            prompt.push('\n');
            prompt.push_str(&self.knowledge_block);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&self.phase_block);
        prompt.push_str("\n\n");

        prompt.push_str(FEW_SHOT);
        prompt.push_str("\n\n");

        if !self.transcript.is_empty() {
            prompt.push_str(TRANSCRIPT_HEADER);
            prompt.push('\n');
            prompt.push_str(&self.transcript);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("{} {}\n", ASKER_LABEL, self.utterance));
        prompt.push_str(CHARACTER_LABEL);
        prompt
    }
}

/// Builds prompts from the turn inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Collect the prompt sections for a turn.
    pub fn assemble(
        &self,
        utterance: &str,
        transcript: &str,
        state: &InvestigationState,
        knowledge_block: &str,
    ) -> AssembledPrompt {
        let utterance = utterance.trim();
        let phase = state.phase();

        AssembledPrompt {
            phase,
            knowledge_block: knowledge_block.trim().to_string(),
            phase_block: PhaseDirective::for_phase(phase).render(utterance),
            transcript: transcript.trim().to_string(),
            utterance: utterance.to_string(),
        }
    }

    /// Build the full prompt text for a turn.
    pub fn build(
        &self,
        utterance: &str,
        transcript: &str,
        state: &InvestigationState,
        knowledge_block: &str,
    ) -> String {
        self.assemble(utterance, transcript, state, knowledge_block)
            .to_prompt_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_file::DiscoveryFlags;

    fn phase1_state() -> InvestigationState {
        InvestigationState::with_values(
            DiscoveryFlags {
                murder_truth_known: true,
                ..Default::default()
            },
            0,
            0,
        )
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let builder = PromptBuilder::new();
        let state = phase1_state();

        let a = builder.build("動機は何だ？", "刑事: やあ\nシグレ: ……どうも。", &state, "- 事実");
        let b = builder.build("動機は何だ？", "刑事: やあ\nシグレ: ……どうも。", &state, "- 事実");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_ends_with_open_character_label() {
        let prompt = PromptBuilder::new().build("  君の名前は？ ", "", &InvestigationState::new(), "");

        assert!(prompt.ends_with("刑事: 君の名前は？\nシグレ:"));
    }

    #[test]
    fn test_section_order() {
        let prompt = PromptBuilder::new().build(
            "ここはどこだ",
            "刑事: こんにちは\nシグレ: ……こんにちは。",
            &InvestigationState::new(),
            "- ここは取調室。",
        );

        let rules = prompt.find("禁忌").unwrap();
        let persona = prompt.find("性格：").unwrap();
        let knowledge = prompt.find(KNOWLEDGE_HEADER).unwrap();
        let phase = prompt.find("【Phase0 指示】").unwrap();
        let few_shot = prompt.find("君の名前を聞いてもいいかな").unwrap();
        let transcript = prompt.find(TRANSCRIPT_HEADER).unwrap();
        let cue = prompt.rfind("刑事: ここはどこだ").unwrap();

        assert!(rules < persona);
        assert!(persona < knowledge);
        assert!(knowledge < phase);
        assert!(phase < few_shot);
        assert!(few_shot < transcript);
        assert!(transcript < cue);
    }

    #[test]
    fn test_optional_sections_omitted_when_empty() {
        let prompt = PromptBuilder::new().build("君の名前は？", "", &InvestigationState::new(), "");

        assert!(!prompt.contains(KNOWLEDGE_HEADER));
        assert!(!prompt.contains(TRANSCRIPT_HEADER));
    }

    #[test]
    fn test_phase_block_follows_state() {
        let builder = PromptBuilder::new();

        let phase0 = builder.assemble("動機は？", "", &InvestigationState::new(), "");
        assert_eq!(phase0.phase, InvestigationPhase::Phase0);
        assert!(phase0.phase_block.starts_with("【Phase0 指示】"));

        let phase1 = builder.assemble("動機は？", "", &phase1_state(), "");
        assert_eq!(phase1.phase, InvestigationPhase::Phase1);
        let forced = PhaseDirective::for_phase(InvestigationPhase::Phase1)
            .forced_reply("動機は？")
            .unwrap();
        assert!(phase1.to_prompt_string().contains(forced));
    }

    #[test]
    fn test_system_rules_present() {
        let prompt = PromptBuilder::new().build("やあ", "", &InvestigationState::new(), "");

        assert!(prompt.contains("1〜3文"));
        assert!(prompt.contains("メタ発言"));
        assert!(prompt.contains("事実を作り出さない"));
        assert!(prompt.contains("……存じません。"));
    }
}
