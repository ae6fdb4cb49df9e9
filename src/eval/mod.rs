//! The evaluator (`V`): walks a [`crate::dag::Dag`] in definition order and
//! reads off the 256 `OUTPUT-Wi-Bj` bits (`§4.3`).
//!
//! Two entry points share one DAG walk: [`evaluate`] is the general
//! three-valued path (`crate::eval::trivalue`), sound for any mix of
//! known/unknown input and constant bits; [`evaluate_bool`] is a packed
//! two-valued fast path for the common case of hashing a concrete message,
//! where every constant and input bit is fully bound. Both paths are
//! exercised against each other and against the `sha2` reference in
//! `tests/pipeline.rs`.

pub mod trivalue;

use std::collections::HashMap;

use crate::dag::{Dag, Node, NodeId};
use crate::signal::Label;
use trivalue::Tri;

/// The 256 output bits of one evaluation, indexed `[word][bit]` with
/// `bit` following `§3`'s `-Bj` convention (`0` is LSB, `31` is MSB).
pub type Digest256<T> = [[T; 32]; 8];

/// Evaluates every live gate under three-valued logic, given bindings for
/// every constant and input leaf. Leaves with no entry in `bindings`
/// evaluate to [`Tri::X`].
pub fn evaluate(dag: &Dag, bindings: &HashMap<Label, Tri>) -> Digest256<Tri> {
    let mut values: Vec<Tri> = Vec::with_capacity(dag.nb_nodes());
    for id in 0..dag.nb_nodes() as NodeId {
        let value = match dag.node(id) {
            Node::Leaf => bindings.get(dag.label(id)).copied().unwrap_or(Tri::X),
            Node::Gate { a, b } => trivalue::nand(values[a as usize], values[b as usize]),
        };
        values.push(value);
    }

    let mut out: Digest256<Tri> = [[Tri::X; 32]; 8];
    for word in 0..8u8 {
        for bit in 0..32u8 {
            let id = dag
                .output_of(word, bit)
                .unwrap_or_else(|| panic!("missing output binding OUTPUT-W{word}-B{bit}"));
            out[word as usize][bit as usize] = values[id as usize];
        }
    }
    out
}

/// Packed two-valued fast path: every constant and input bit must be fully
/// bound to `0`/`1`. Panics (a caller bug, not a circuit-level error) if a
/// leaf has no binding — callers that might see unbound bits should use
/// [`evaluate`] instead.
pub fn evaluate_bool(dag: &Dag, bindings: &HashMap<Label, bool>) -> Digest256<bool> {
    let mut values: Vec<bool> = Vec::with_capacity(dag.nb_nodes());
    for id in 0..dag.nb_nodes() as NodeId {
        let value = match dag.node(id) {
            Node::Leaf => *bindings
                .get(dag.label(id))
                .unwrap_or_else(|| panic!("unbound leaf {:?} in two-valued evaluation", dag.label(id))),
            Node::Gate { a, b } => !(values[a as usize] && values[b as usize]),
        };
        values.push(value);
    }

    let mut out: Digest256<bool> = [[false; 32]; 8];
    for word in 0..8u8 {
        for bit in 0..32u8 {
            let id = dag
                .output_of(word, bit)
                .unwrap_or_else(|| panic!("missing output binding OUTPUT-W{word}-B{bit}"));
            out[word as usize][bit as usize] = values[id as usize];
        }
    }
    out
}

/// Packs a fully-bound [`Digest256<bool>`] into the 32-byte SHA-256
/// digest: each `OUTPUT-Wi` word is MSB-first (bit 31 down to bit 0), and
/// the eight words concatenate big-endian (`§4.3`).
pub fn digest_bytes(digest: &Digest256<bool>) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (word_idx, word_bits) in digest.iter().enumerate() {
        let mut word = 0u32;
        for bit in (0..32u8).rev() {
            word = (word << 1) | (word_bits[bit as usize] as u32);
        }
        out[word_idx * 4..word_idx * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Formats a (possibly partially unknown) digest as 64 hex characters: a
/// nibble with every bit known prints as a hex digit, a nibble with any
/// `X` bit prints as a lowercase `x` (`§4.3`).
pub fn format_digest(digest: &Digest256<Tri>) -> String {
    let mut out = String::with_capacity(64);
    for word_bits in digest.iter() {
        // Nibbles are groups of 4 bits MSB-first within the word: bits
        // 31..28 are the first hex digit, down to bits 3..0 as the last.
        for nibble_hi in (0..32u8).step_by(4).rev() {
            let bits = [
                word_bits[(nibble_hi + 3) as usize],
                word_bits[(nibble_hi + 2) as usize],
                word_bits[(nibble_hi + 1) as usize],
                word_bits[nibble_hi as usize],
            ];
            if bits.iter().any(|b| *b == Tri::X) {
                out.push('x');
                continue;
            }
            let mut nibble = 0u8;
            for b in bits {
                nibble = (nibble << 1) | (b.as_bool().unwrap() as u8);
            }
            out.push(std::char::from_digit(nibble as u32, 16).unwrap());
        }
    }
    out
}
