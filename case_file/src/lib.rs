//! # Case File
//!
//! The static data of the interrogation: what the detective has uncovered,
//! how far the interrogated character trusts them, and which facts she may
//! disclose under which conditions. This crate holds no generation logic.

pub mod investigation;
pub mod knowledge;
pub mod scenario;

pub use investigation::*;
pub use knowledge::*;
pub use scenario::*;
