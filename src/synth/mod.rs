//! The NAND synthesizer (`S`): turns the word model into a gate-level
//! [`crate::dag::Dag`] (`§4.1`).

pub mod decompose;
pub mod synthesize;

pub use synthesize::{synthesize, synthesize_from_functions};
