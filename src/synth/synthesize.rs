//! The NAND synthesizer (`S`): drives the word model and bit expander
//! into a single [`Dag`] of two-input NAND gates, binding all 256
//! `OUTPUT-Wi-Bj` aliases at the end (`§4.1`).

use std::collections::HashMap;

use crate::bits::expand_word;
use crate::dag::{Dag, NodeId};
use crate::error::{Error, Result};
use crate::signal::Label;
use crate::synth::decompose::{add32, and32, ch32, maj32, not32, or32, rotr_nodes, shr_nodes, xor32};
use crate::word::{generate_sha256_word_model, WordOp};

/// Synthesizes the full NAND circuit for one SHA-256 compression, from
/// the crate's own word model generator.
///
/// Interns the 8704 reserved bit-level leaves (`CONST-0/1`, 512 input
/// bits, 2048 round-constant bits, 256 initial-hash bits), then replays
/// the word model one operation at a time, looking up each operand's 32
/// constituent bits and emitting the corresponding NAND decomposition.
/// The generator is a fixed, internally-tested artifact, so operand
/// lookups here are `panic`-on-bug rather than `Result`-returning: any
/// failure would mean the generator itself is broken, not that a caller
/// supplied bad input.
pub fn synthesize() -> Result<Dag> {
    let model = generate_sha256_word_model();
    synthesize_ops(&model.ops, &model.final_words, "<word model>")
}

/// Synthesizes a NAND circuit from a `functions.txt`-shaped operation
/// list (`§6`), such as one parsed with [`crate::io::parse_functions`].
///
/// `functions.txt` carries no explicit output marker, so the synthesizer
/// uses the same convention the word model generator's own output
/// satisfies by construction: the eight final hash-update `ADD`s are the
/// last eight operations emitted, in `H0..H7` order (`§4.1` "Output
/// binding"). A `functions.txt` with fewer than eight operations cannot
/// be a complete compression and is rejected.
pub fn synthesize_from_functions(ops: &[(Label, WordOp)]) -> Result<Dag> {
    if ops.len() < 8 {
        return Err(Error::OutputCardinality { found: 0 });
    }
    let final_words: Vec<Label> = ops[ops.len() - 8..].iter().map(|(l, _)| l.clone()).collect();
    let final_words: [Label; 8] = final_words
        .try_into()
        .expect("exactly eight trailing labels sliced above");
    synthesize_ops(ops, &final_words, "functions.txt")
}

/// Shared synthesis core: interns the reserved leaves, replays `ops` in
/// order, and binds `final_words` to the 256 `OUTPUT-Wi-Bj` aliases.
fn synthesize_ops(ops: &[(Label, WordOp)], final_words: &[Label; 8], source: &str) -> Result<Dag> {
    let mut dag = Dag::new();
    dag.intern_reserved_leaves()?;
    let mut bound: HashMap<Label, NodeId> = HashMap::new();
    let const0 = dag.id_of(&Label::const0()).expect("CONST-0 just interned");
    for word in 0..16u8 {
        for bit in 0..32u8 {
            let label = Label::input(word, bit);
            bound.insert(label.clone(), dag.id_of(&label).unwrap());
        }
    }
    for index in 0..64u8 {
        for bit in 0..32u8 {
            let label = Label::round_constant(index, bit);
            bound.insert(label.clone(), dag.id_of(&label).unwrap());
        }
    }
    for index in 0..8u8 {
        for bit in 0..32u8 {
            let label = Label::initial_hash(index, bit);
            bound.insert(label.clone(), dag.id_of(&label).unwrap());
        }
    }
    bound.insert(Label::const0(), const0);
    bound.insert(Label::const1(), dag.id_of(&Label::const1()).unwrap());

    for (label, op) in ops {
        let result = match op {
            WordOp::Copy(a) => lookup_word(source, label, &bound, a)?,
            WordOp::Not(a) => {
                let av = lookup_word(source, label, &bound, a)?;
                not32(&mut dag, &av)
            }
            WordOp::And(a, b) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                and32(&mut dag, &av, &bv)
            }
            WordOp::Or(a, b) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                or32(&mut dag, &av, &bv)
            }
            WordOp::Xor(a, b) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                xor32(&mut dag, &av, &bv)
            }
            WordOp::Add(a, b) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                add32(&mut dag, &av, &bv, const0)
            }
            WordOp::Rotr(a, n) => {
                let av = lookup_word(source, label, &bound, a)?;
                rotr_nodes(&av, *n)
            }
            WordOp::Shr(a, n) => {
                let av = lookup_word(source, label, &bound, a)?;
                shr_nodes(&av, *n, const0)
            }
            WordOp::Ch(a, b, c) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                let cv = lookup_word(source, label, &bound, c)?;
                ch32(&mut dag, &av, &bv, &cv)
            }
            WordOp::Maj(a, b, c) => {
                let av = lookup_word(source, label, &bound, a)?;
                let bv = lookup_word(source, label, &bound, b)?;
                let cv = lookup_word(source, label, &bound, c)?;
                maj32(&mut dag, &av, &bv, &cv)
            }
        };

        let out_bits = expand_word(label);
        for (bit, node) in out_bits.iter().zip(result.iter()) {
            bound.insert(bit.clone(), *node);
        }
    }

    for (word_idx, final_label) in final_words.iter().enumerate() {
        let bits = lookup_word(source, final_label, &bound, final_label)?;
        for (bit_idx, node) in bits.iter().enumerate() {
            dag.bind_output(word_idx as u8, bit_idx as u8, *node);
        }
    }

    dag.check_output_cardinality()?;
    dag.check_topo_order()?;
    Ok(dag)
}

fn lookup_word(
    source: &str,
    referrer: &Label,
    bound: &HashMap<Label, NodeId>,
    label: &Label,
) -> Result<[NodeId; 32]> {
    let bit_labels = expand_word(label);
    let mut out = [0 as NodeId; 32];
    for (i, bl) in bit_labels.iter().enumerate() {
        out[i] = *bound.get(bl).ok_or_else(|| Error::UndefinedReference {
            file: source.to_string(),
            line: 0,
            referrer: referrer.as_str().to_string(),
            reference: bl.as_str().to_string(),
        })?;
    }
    Ok(out)
}
