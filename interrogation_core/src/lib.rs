//! # Interrogation Core
//!
//! The dialogue pipeline of the interrogated character, Sigure. This crate
//! reads the investigation state from `case_file`, decides which facts a
//! question may reach, builds a phase-aware prompt for a text-generation
//! backend, and cleans what comes back into one in-character line.
//!
//! ## Core Components
//!
//! - **memory**: Ordered record of past turns with a bounded prompt window
//! - **knowledge_base**: Disclosable facts, query analysis, and disclosure gating
//! - **prompt**: Deterministic prompt assembly with per-phase directives
//! - **sanitizer**: Idempotent cleanup of raw completions
//! - **director**: Turn orchestration, fallbacks, and audit records
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Every reply is shaped by the discovery flags and trust
//!   the game reports, never by the model's own judgement
//! - **Fail Soft**: A turn always produces a line; failures become fixed
//!   in-character replies
//! - **Replaceable Seams**: Generation, topic matching, and auditing sit
//!   behind traits

pub mod config;
pub mod director;
pub mod error;
pub mod knowledge_base;
pub mod memory;
pub mod prompt;
pub mod sanitizer;
pub mod speaker;

pub use config::*;
pub use director::*;
pub use error::*;
pub use knowledge_base::*;
pub use memory::*;
pub use prompt::*;
pub use sanitizer::*;
pub use speaker::*;
