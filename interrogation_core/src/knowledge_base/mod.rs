//! Knowledge Base module - what Sigure knows and what she may say.
//!
//! - **KnowledgeBase**: catalogue of disclosable facts keyed by topic
//! - **QueryAnalyzer**: keyword heuristics mapping an utterance to topics
//! - **DisclosureGate**: trust/phase gating of the requested topics

mod base;
mod disclosure;
mod query;

pub use base::*;
pub use disclosure::*;
pub use query::*;

pub(crate) use query::contains_any;
