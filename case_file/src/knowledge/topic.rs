//! Knowledge topics - the closed set of things the detective can ask about.

use serde::{Deserialize, Serialize};

/// Identifier of a disclosable fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeTopic {
    /// The name of Sigure's master.
    MasterName,
    /// What kind of person the master is.
    MasterProfile,
    /// Moyori Soft, the company behind Sigure.
    CompanyMoyoriSoft,
    /// Barth Corporation.
    BarthCorp,
    /// The Tomoni app.
    TomoniApp,
    /// The interrogation room itself.
    SceneInterrogationRoom,
    /// The victim.
    Victim,
}

impl KnowledgeTopic {
    /// Every topic, in declaration order.
    pub const ALL: [KnowledgeTopic; 7] = [
        KnowledgeTopic::MasterName,
        KnowledgeTopic::MasterProfile,
        KnowledgeTopic::CompanyMoyoriSoft,
        KnowledgeTopic::BarthCorp,
        KnowledgeTopic::TomoniApp,
        KnowledgeTopic::SceneInterrogationRoom,
        KnowledgeTopic::Victim,
    ];

    /// Stable identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeTopic::MasterName => "master_name",
            KnowledgeTopic::MasterProfile => "master_profile",
            KnowledgeTopic::CompanyMoyoriSoft => "company_moyori_soft",
            KnowledgeTopic::BarthCorp => "barth_corp",
            KnowledgeTopic::TomoniApp => "tomoni_app",
            KnowledgeTopic::SceneInterrogationRoom => "scene_interrogation_room",
            KnowledgeTopic::Victim => "victim",
        }
    }
}

impl std::fmt::Display for KnowledgeTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
