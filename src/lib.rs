//! A pure-NAND circuit for the SHA-256 compression function.
//!
//! This crate builds, optimizes, and evaluates a purely combinational
//! Boolean circuit — a directed acyclic graph over a single primitive gate,
//! two-input NAND — that computes SHA-256's compression function for a
//! single 512-bit block. The pipeline has five stages, leaves first:
//!
//! - `word`
//!   The word model: SHA-256 expressed as a fixed sequence of named
//!   32-bit operations (XOR/AND/OR/NOT/ADD/ROTR/SHR plus the CH/MAJ/Σ/σ
//!   mixing functions), independent of any particular message.
//!
//! - `bits`
//!   The bit expander: lifts a 32-bit word label into its 32 individually
//!   addressable bit-level signal labels.
//!
//! - `synth`
//!   The NAND synthesizer: replays the word model through per-operator
//!   NAND decompositions, producing a gate-level [`dag::Dag`].
//!
//! - `rewrite`
//!   The rewrite engine: a fixed-point iteration of constant folding,
//!   algebraic simplification, shared-inverter merging, common
//!   subexpression elimination, and dead-code elimination, each pass
//!   provably preserving the circuit's function.
//!
//! - `eval`
//!   The evaluator: walks the DAG under two- or three-valued logic and
//!   reads off the 256 output bits as a digest.
//!
//! Two modules wrap the core with the surrounding plumbing needed to run
//! it from a shell: `pad` (message construction and SHA-256 padding) and
//! `io` (the line-oriented text formats every stage reads or writes).
//! `dag`, `signal`, and `error` are shared foundations used throughout.
//!
//! # Design goals
//!
//! - Every rewrite is provably function-preserving, never merely
//!   empirically likely to be.
//! - Every intermediate artifact is a flat, inspectable text file.
//! - No stage ever assumes a particular message; only `pad` and the CLI
//!   binary ever see message bytes.

pub mod bits;
pub mod dag;
pub mod error;
pub mod eval;
pub mod io;
pub mod pad;
pub mod rewrite;
pub mod signal;
pub mod synth;
pub mod word;

pub use error::{Error, Result};
