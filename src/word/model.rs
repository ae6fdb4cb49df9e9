//! The word model generator.
//!
//! Builds the one, fixed sequence of 32-bit word operations that computes
//! the SHA-256 compression function for a single block (`§3`/`§4.1`). The
//! generator never reads message bytes or constant values — it only ever
//! refers to `INPUT-W0..W15`, `K-0..K63`, and `H-INIT-0..H-INIT7` by label —
//! so the same [`WordModel`] is reused for every message the bit expander
//! and synthesizer are later run against.

use crate::signal::Label;
use crate::word::ops::WordOp;

/// The full word-level operation list for one compression, plus the eight
/// labels whose final values become the 256 `OUTPUT-*` bits once the
/// synthesizer binds them bit by bit.
#[derive(Debug, Clone)]
pub struct WordModel {
    pub ops: Vec<(Label, WordOp)>,
    pub final_words: [Label; 8],
}

/// Accumulates `(label, op)` pairs under a private, monotonically
/// increasing temporary-label counter. Mirrors the way a gate-level DAG
/// builder hands out fresh synthetic names for intermediate results; here
/// the names are word-level (`t0`, `t1`, ...) rather than gate ordinals.
struct Builder {
    ops: Vec<(Label, WordOp)>,
    next_temp: u64,
}

impl Builder {
    fn new() -> Self {
        Builder {
            ops: Vec::new(),
            next_temp: 0,
        }
    }

    fn temp(&mut self) -> Label {
        let label = Label::new(format!("t{}", self.next_temp));
        self.next_temp += 1;
        label
    }

    fn push(&mut self, op: WordOp) -> Label {
        let label = self.temp();
        self.ops.push((label.clone(), op));
        label
    }

    fn xor(&mut self, a: &Label, b: &Label) -> Label {
        self.push(WordOp::Xor(a.clone(), b.clone()))
    }

    fn add(&mut self, a: &Label, b: &Label) -> Label {
        self.push(WordOp::Add(a.clone(), b.clone()))
    }

    fn rotr(&mut self, a: &Label, n: u32) -> Label {
        self.push(WordOp::Rotr(a.clone(), n))
    }

    fn shr(&mut self, a: &Label, n: u32) -> Label {
        self.push(WordOp::Shr(a.clone(), n))
    }

    fn ch(&mut self, a: &Label, b: &Label, c: &Label) -> Label {
        self.push(WordOp::Ch(a.clone(), b.clone(), c.clone()))
    }

    fn maj(&mut self, a: &Label, b: &Label, c: &Label) -> Label {
        self.push(WordOp::Maj(a.clone(), b.clone(), c.clone()))
    }

    /// `ROTR(a,r1) ^ ROTR(a,r2) ^ SHR(a,s)` — the shape shared by the
    /// lowercase σ0/σ1 functions used in the message schedule (`§3`).
    fn sigma(&mut self, a: &Label, r1: u32, r2: u32, s: u32) -> Label {
        let x = self.rotr(a, r1);
        let y = self.rotr(a, r2);
        let z = self.shr(a, s);
        let xy = self.xor(&x, &y);
        self.xor(&xy, &z)
    }

    /// `ROTR(a,r1) ^ ROTR(a,r2) ^ ROTR(a,r3)` — the shape shared by the
    /// capital Σ0/Σ1 functions used on the working variables; unlike σ0/σ1
    /// there is no `SHR` term, only three rotations XORed together.
    fn big_sigma(&mut self, a: &Label, r1: u32, r2: u32, r3: u32) -> Label {
        let x = self.rotr(a, r1);
        let y = self.rotr(a, r2);
        let z = self.rotr(a, r3);
        let xy = self.xor(&x, &y);
        self.xor(&xy, &z)
    }
}

/// Word-level labels for the reserved inputs/constants, as referenced by
/// `functions.txt` (`§6`): whole 32-bit words, with no per-bit suffix.
/// Distinct from [`Label::input`]/[`Label::round_constant`]/
/// [`Label::initial_hash`] in `signal.rs`, which name individual bits
/// after the bit expander has run.
fn input_word(i: u8) -> Label {
    Label::new(format!("INPUT-W{i}"))
}

fn round_constant_word(i: u8) -> Label {
    Label::new(format!("K-{i}"))
}

fn initial_hash_word(i: u8) -> Label {
    Label::new(format!("H-INIT-{i}"))
}

/// Generates the word-level description of SHA-256's compression function
/// for a single 512-bit block.
pub fn generate_sha256_word_model() -> WordModel {
    let mut b = Builder::new();

    // Message schedule: w[0..16] are the block's input words directly;
    // w[16..64] are each the 32-bit modular sum of two prior schedule
    // words and the two sigma-mixed predecessors (FIPS 180-4 §6.2.2).
    let mut w: Vec<Label> = (0..16u8).map(input_word).collect();
    for t in 16..64usize {
        let s0 = b.sigma(&w[t - 15], 7, 18, 3);
        let s1 = b.sigma(&w[t - 2], 17, 19, 10);
        let sum1 = b.add(&w[t - 16], &s0);
        let sum2 = b.add(&sum1, &w[t - 7]);
        let wt = b.add(&sum2, &s1);
        w.push(wt);
    }

    // Working variables, initialized from the block's running hash state.
    let mut state: Vec<Label> = (0..8u8).map(initial_hash_word).collect();

    for t in 0..64usize {
        let (a, bb, c, d, e, f, g, h) = (
            state[0].clone(),
            state[1].clone(),
            state[2].clone(),
            state[3].clone(),
            state[4].clone(),
            state[5].clone(),
            state[6].clone(),
            state[7].clone(),
        );

        let big_s1 = b.big_sigma(&e, 6, 11, 25);
        let ch = b.ch(&e, &f, &g);
        let k_t = round_constant_word(t as u8);
        let sum1 = b.add(&h, &big_s1);
        let sum2 = b.add(&sum1, &ch);
        let sum3 = b.add(&sum2, &k_t);
        let temp1 = b.add(&sum3, &w[t]);

        let big_s0 = b.big_sigma(&a, 2, 13, 22);
        let maj = b.maj(&a, &bb, &c);
        let temp2 = b.add(&big_s0, &maj);

        let new_e = b.add(&d, &temp1);
        let new_a = b.add(&temp1, &temp2);

        state = vec![new_a, a, bb, c, new_e, e, f, g];
    }

    // H_out[i] = H_init[i] + state[i] (FIPS 180-4 §6.2.2 step 4).
    let mut final_words = Vec::with_capacity(8);
    for i in 0..8u8 {
        let h_init = initial_hash_word(i);
        let sum = b.add(&h_init, &state[i as usize]);
        final_words.push(sum);
    }

    WordModel {
        ops: b.ops,
        final_words: final_words
            .try_into()
            .expect("exactly eight final words"),
    }
}
