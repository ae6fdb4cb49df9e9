//! Error types shared by every stage of the circuit pipeline.
//!
//! Every fatal condition described by the specification's error-handling
//! design is a distinct variant here so that callers can match on failure
//! kind rather than parse a message. Diagnostics that are non-fatal (the
//! optimizer's did-not-converge warning, the evaluator reporting a mismatch
//! it still computed) are logged via [`log`] instead of returned as errors.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing, synthesizing, rewriting, or evaluating
/// the circuit.
#[derive(Error, Debug)]
pub enum Error {
    /// A line in one of the `§6` text formats could not be parsed.
    #[error("{file}:{line}: malformed line: {text:?}")]
    MalformedLine {
        file: String,
        line: usize,
        text: String,
    },

    /// A gate or output referenced a label that is not yet defined.
    #[error("{file}:{line}: undefined reference {reference:?} (from {referrer:?})")]
    UndefinedReference {
        file: String,
        line: usize,
        referrer: String,
        reference: String,
    },

    /// A label was defined twice within the same circuit.
    #[error("{file}: label {label:?} defined twice (first at line {first_line}, again at line {second_line})")]
    DuplicateLabel {
        file: String,
        label: String,
        first_line: usize,
        second_line: usize,
    },

    /// A word-level opcode was not recognized.
    #[error("{file}:{line}: unknown opcode {opcode:?}")]
    UnknownOpcode {
        file: String,
        line: usize,
        opcode: String,
    },

    /// A `ROTR`/`SHR` shift count fell outside `1..=31`.
    #[error("{file}:{line}: shift count {count} out of range (expected 1..=31)")]
    ShiftOutOfRange {
        file: String,
        line: usize,
        count: i64,
    },

    /// Synthesis or a rewrite pass left the DAG with a number of distinct
    /// `OUTPUT-*` aliases other than 256, or with a label outside
    /// `{OUTPUT-Wi-Bj | 0<=i<8, 0<=j<32}`.
    #[error("output cardinality violation: expected 256 outputs, found {found}")]
    OutputCardinality { found: usize },

    /// A rewrite would have introduced a reference to a signal not yet
    /// defined in the current ordering. This can only happen through an
    /// internal bug; by construction no rewrite should ever trigger it.
    #[error("internal invariant violation: cycle introduced by rewrite at {label:?}: {detail}")]
    CycleIntroduced { label: String, detail: String },

    /// The evaluator's computed digest disagreed with the reference
    /// SHA-256 implementation. Fatal for the `verify` subcommand; the
    /// evaluator itself never returns this, it only logs the computed
    /// digest alongside the mismatch.
    #[error("verification mismatch for message {message:?}: circuit={circuit_digest} reference={reference_digest}")]
    VerificationMismatch {
        message: String,
        circuit_digest: String,
        reference_digest: String,
    },

    /// The input generator was asked to pad a message longer than the
    /// 55-byte single-block limit.
    #[error("message of {len} bytes exceeds the single-block limit of 55 bytes")]
    MessageTooLong { len: usize },

    /// Wraps an underlying I/O failure while reading or writing one of the
    /// `§6` artifact files.
    #[error("I/O error on {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed hex input to `generate-input --hex`.
    #[error("invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
