//! Query analysis - which knowledge topics a detective's question asks for.
//!
//! Matching is plain substring containment on the case-folded utterance.
//! Anything smarter can replace [`QueryAnalyzer`] behind [`TopicMatcher`]
//! without touching the gate or the prompt.

use case_file::KnowledgeTopic;

/// Maps an utterance to the ordered, de-duplicated topics it requests.
pub trait TopicMatcher: Send + Sync {
    fn requested_topics(&self, text: &str) -> Vec<KnowledgeTopic>;
}

/// A keyword rule: every group must have at least one keyword present.
struct TopicRule {
    topic: KnowledgeTopic,
    groups: &'static [&'static [&'static str]],
}

/// Rules in check order. Order of the result follows this list.
const RULES: &[TopicRule] = &[
    TopicRule {
        topic: KnowledgeTopic::MasterName,
        groups: &[&["主人"], &["名前", "なまえ"]],
    },
    TopicRule {
        topic: KnowledgeTopic::MasterProfile,
        groups: &[&["主人"], &["どんな", "人物", "プロフィール"]],
    },
    TopicRule {
        topic: KnowledgeTopic::CompanyMoyoriSoft,
        groups: &[&["モヨリ", "moyori"]],
    },
    TopicRule {
        topic: KnowledgeTopic::BarthCorp,
        groups: &[&["バース", "barth"]],
    },
    TopicRule {
        topic: KnowledgeTopic::TomoniApp,
        groups: &[&["トモニ", "tomoni"]],
    },
    TopicRule {
        topic: KnowledgeTopic::SceneInterrogationRoom,
        groups: &[&["ここ", "取り調べ", "取調室"]],
    },
    TopicRule {
        topic: KnowledgeTopic::Victim,
        groups: &[&["被害者", "殺された人", "犠牲者"]],
    },
];

/// Check whether the text contains any of the keywords.
pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Keyword-based topic matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Topics requested by the utterance, in rule order. Empty if none match.
    pub fn analyze(text: &str) -> Vec<KnowledgeTopic> {
        let folded = text.to_lowercase();
        let mut topics = Vec::new();

        for rule in RULES {
            let matched = rule
                .groups
                .iter()
                .all(|group| contains_any(&folded, group));
            if matched && !topics.contains(&rule.topic) {
                topics.push(rule.topic);
            }
        }

        topics
    }
}

impl TopicMatcher for QueryAnalyzer {
    fn requested_topics(&self, text: &str) -> Vec<KnowledgeTopic> {
        Self::analyze(text)
    }
}
