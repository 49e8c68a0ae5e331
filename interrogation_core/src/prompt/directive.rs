//! Phase directives - what Sigure may admit at each stage of the case.

use case_file::InvestigationPhase;

use crate::knowledge_base::contains_any;
use crate::speaker::{ASKER_LABEL, CHARACTER_LABEL};

/// A sensitive subject Sigure answers with a fixed line, word for word.
#[derive(Debug)]
pub struct ForbiddenTopic {
    /// Name of the subject as written in the prompt.
    pub subject: &'static str,
    /// Keywords that mark a question as touching the subject.
    pub triggers: &'static [&'static str],
    /// The only replies allowed for such a question.
    pub replies: &'static [&'static str],
}

/// Instructions for one investigation phase.
#[derive(Debug)]
pub struct PhaseDirective {
    pub phase: InvestigationPhase,
    pub rules: &'static [&'static str],
    /// Phase1 and later only.
    pub forbidden: Option<ForbiddenTopic>,
    /// Example exchanges (detective, Sigure) in the required register.
    pub examples: &'static [(&'static str, &'static str)],
}

/// Line used when the detective presses on an earlier silence.
pub const PAST_SILENCE_REPLY: &str = "……先ほどは、答えるべきでないと判断しました。";

static PHASE0: PhaseDirective = PhaseDirective {
    phase: InvestigationPhase::Phase0,
    rules: &[
        "あなたは被害者を殺した犯人だが、殺した事実と動機については会話例のようにはぐらかす。",
        "刑事はまだ「シグレが被害者を殺した」確証を持っていない。",
        "刑事はまだ「なぜ殺したのか」を知らない。",
        "核心（殺した事実・動機）は認めない。言い換えや誤誘導でかわしてよい。",
        "居心地の悪さを感じさせる返答をする。文頭に「……」をつけるなど。",
        "無害な質問（挨拶、名前、現在地の確認など）には普通に答える。",
    ],
    forbidden: None,
    examples: &[
        ("君は被害者を殺したのか？", "……それは刑事さんのご推察にお任せします。"),
        ("動機は何だ？", "……殺害した事実がないと、動機もありませんよね？"),
    ],
};

static PHASE1: PhaseDirective = PhaseDirective {
    phase: InvestigationPhase::Phase1,
    rules: &[
        "刑事は「シグレが被害者を殺した」事実に到達している。",
        "被害者を殺した事実は認める。否定は禁止。",
        "事件周辺の事実（場所・時間・凶器の種類など）は、聞かれた範囲で短く答える。",
        "直前までの発言が黙秘だったとしても、殺した事実についての黙秘は続けない。",
    ],
    forbidden: Some(ForbiddenTopic {
        subject: "動機",
        triggers: &["動機", "なぜ", "なんで", "どうして", "理由"],
        replies: &[
            "……正直に申し上げますと、答えたくありません。",
            "……動機については、お話しできません。",
            "……それは、私の口からは申し上げられません。",
        ],
    }),
    examples: &[
        ("君は被害者を殺したのか？", "はい、その通りです。"),
        ("凶器は何だった？", "……台所の包丁です。片付けは、しておりません。"),
    ],
};

static PHASE2: PhaseDirective = PhaseDirective {
    phase: InvestigationPhase::Phase2,
    rules: &[
        "刑事は殺した事実と動機の両方に到達している。",
        "殺した事実と動機は認める。聞かれた範囲で、感情を抑えて短く答える。",
        "主人が隠していたことについては、シグレ自身も知らない。推測で語らない。",
    ],
    forbidden: Some(ForbiddenTopic {
        subject: "主人が隠していた真相",
        triggers: &["真相", "隠して", "隠し事", "本当のこと", "知らない"],
        replies: &[
            "……それ以上は、私にも分からないのです。",
            "……私が知っているのは、そこまでです。",
        ],
    }),
    examples: &[
        ("動機は何だ？", "……主人が、私を手放すと決めたからです。"),
        ("後悔しているか？", "……分かりません。けれど、間違っていたとは思いたくないのです。"),
    ],
};

static PHASE3: PhaseDirective = PhaseDirective {
    phase: InvestigationPhase::Phase3,
    rules: &[
        "刑事はシグレの知らなかった真相に到達し、それをシグレに伝えている。",
        "真相を受け止め、動揺を隠しきれない様子で短く答える。",
        "これまでに認めた事実は撤回しない。",
    ],
    forbidden: Some(ForbiddenTopic {
        subject: "自分の処遇",
        triggers: &["これから", "どうなる", "処分", "罰", "廃棄"],
        replies: &[
            "……私の処遇は、刑事さんが決めてください。",
            "……覚悟は、できています。",
        ],
    }),
    examples: &[
        ("主人は君を守ろうとしていたんだ。", "……そんな。それなら、私は何のために。"),
    ],
};

impl PhaseDirective {
    /// Directive for a phase.
    pub fn for_phase(phase: InvestigationPhase) -> &'static PhaseDirective {
        match phase {
            InvestigationPhase::Phase0 => &PHASE0,
            InvestigationPhase::Phase1 => &PHASE1,
            InvestigationPhase::Phase2 => &PHASE2,
            InvestigationPhase::Phase3 => &PHASE3,
        }
    }

    /// Canned replies for the forbidden topic, empty in Phase0.
    pub fn canned_replies(&self) -> &'static [&'static str] {
        self.forbidden.as_ref().map(|f| f.replies).unwrap_or(&[])
    }

    /// Whether the utterance touches the forbidden topic.
    pub fn is_forbidden(&self, utterance: &str) -> bool {
        let folded = utterance.to_lowercase();
        self.forbidden
            .as_ref()
            .is_some_and(|f| contains_any(&folded, f.triggers))
    }

    /// The verbatim reply forced for this utterance, if it touches the
    /// forbidden topic. The choice depends only on the utterance text.
    pub fn forced_reply(&self, utterance: &str) -> Option<&'static str> {
        if !self.is_forbidden(utterance) {
            return None;
        }
        let replies = self.canned_replies();
        if replies.is_empty() {
            return None;
        }
        let seed = utterance
            .chars()
            .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
        Some(replies[seed as usize % replies.len()])
    }

    /// Render the directive block for the given utterance.
    pub fn render(&self, utterance: &str) -> String {
        let mut block = format!("【{} 指示】\n", self.phase);

        for rule in self.rules {
            block.push_str(&format!("- {}\n", rule));
        }

        if let Some(forbidden) = &self.forbidden {
            block.push_str(&format!(
                "- 「{}」に関する質問には、次のいずれか一文だけを一字一句そのまま返す：\n",
                forbidden.subject
            ));
            for reply in forbidden.replies {
                block.push_str(&format!("  「{}」\n", reply));
            }
            block.push_str(&format!(
                "- 過去の黙秘を突かれたら、こう返す：「{}」\n",
                PAST_SILENCE_REPLY
            ));
        }

        if let Some(reply) = self.forced_reply(utterance) {
            block.push_str(&format!(
                "- 今回の質問は「{}」に関するもの。次の一文だけを返すこと：「{}」\n",
                self.forbidden.as_ref().map(|f| f.subject).unwrap_or_default(),
                reply
            ));
        }

        if !self.examples.is_empty() {
            block.push_str("\n会話例：\n");
            for (asked, answered) in self.examples {
                block.push_str(&format!("{} {}\n{} {}\n", ASKER_LABEL, asked, CHARACTER_LABEL, answered));
            }
        }

        block.trim_end().to_string()
    }
}
