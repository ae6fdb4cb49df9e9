//! Pass C1: constant folding.
//!
//! Seeds a known-value map from the leaves whose value is fixed at
//! optimize time — `CONST-0`/`CONST-1` and the bit-expanded round
//! constants and initial hash state — then propagates that knowledge
//! forward in definition order, folding any gate whose both operands are
//! known into the matching constant leaf.
//!
//! Message input bits (`INPUT-Wi-Bj`) are deliberately never seeded as
//! known: one optimized circuit must serve any message, so the optimizer
//! may only ever exploit knowledge of the constants, never the message.

use std::collections::HashMap;

use crate::dag::{Dag, Node, NodeId};
use crate::signal::Label;
use crate::word::consts::{H256_INIT, K256};

/// Builds the known-value map for the leaves whose bit value is fixed
/// regardless of message: the two boolean constants, the 2048
/// round-constant bits, and the 256 initial-hash bits.
pub fn seed_known_constants(dag: &Dag) -> HashMap<NodeId, bool> {
    let mut known = HashMap::new();

    if let Some(id) = dag.id_of(&Label::const0()) {
        known.insert(id, false);
    }
    if let Some(id) = dag.id_of(&Label::const1()) {
        known.insert(id, true);
    }

    for (index, &value) in K256.iter().enumerate() {
        for bit in 0..32u8 {
            if let Some(id) = dag.id_of(&Label::round_constant(index as u8, bit)) {
                known.insert(id, bit_at(value, bit));
            }
        }
    }
    for (index, &value) in H256_INIT.iter().enumerate() {
        for bit in 0..32u8 {
            if let Some(id) = dag.id_of(&Label::initial_hash(index as u8, bit)) {
                known.insert(id, bit_at(value, bit));
            }
        }
    }

    known
}

/// Bit `bit` of `value`, LSB first (bit 0 is the least significant bit),
/// matching `§6`'s "`-B0` is LSB" convention and `crate::bits`'s word
/// expansion.
fn bit_at(value: u32, bit: u8) -> bool {
    ((value >> bit as u32) & 1) == 1
}

/// Folds every gate whose value is determined by the three-valued NAND
/// table (`§4.3`) into `CONST-0` or `CONST-1`, scanning once in
/// definition order against the `known` map as it stood at the start of
/// this call. The scan only ever reads `dag`/`known`; every fold it finds
/// is queued and applied to `dag` (and folded into `known`) only after
/// the scan completes, so a gate discovered to fold on this pass is not
/// yet visible to a later gate visited in the same scan (`§5`: "queue
/// their effects ... and apply them atomically at pass end, so that no
/// pass ever observes a partially rewritten DAG"). A chain of N
/// dependent constant gates therefore takes N rounds to collapse, one
/// layer of propagation per round, not one pass. Returns the number of
/// gates folded.
///
/// Matches the table's short-circuit, not just its fully-bound case: a
/// gate folds to `1` as soon as *either* operand is known `0`, even if
/// the other operand is message-dependent and never becomes known
/// itself. This is what lets the LSB full adder's `cin = CONST-0` erase
/// the first `NAND(a, cin)` in its sum XOR down to a known `1` despite
/// `a` varying with the message.
pub fn constant_fold(dag: &mut Dag, known: &mut HashMap<NodeId, bool>) -> usize {
    let const0 = dag.id_of(&Label::const0()).expect("CONST-0 must be interned");
    let const1 = dag.id_of(&Label::const1()).expect("CONST-1 must be interned");
    let mut newly_known: Vec<(NodeId, bool)> = Vec::new();

    for id in 0..dag.nb_nodes() as NodeId {
        if known.contains_key(&id) {
            continue;
        }
        if let Node::Gate { a, b } = dag.node(id) {
            let av = known.get(&a).copied();
            let bv = known.get(&b).copied();
            let resolved = match (av, bv) {
                (Some(false), _) | (_, Some(false)) => Some(true),
                (Some(true), Some(true)) => Some(false),
                _ => None,
            };
            if let Some(value) = resolved {
                newly_known.push((id, value));
            }
        }
    }

    for &(id, value) in &newly_known {
        known.insert(id, value);
        let target = if value { const1 } else { const0 };
        dag.replace(id, target);
    }

    newly_known.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_at_matches_lsb_first_convention() {
        assert!(bit_at(0x8000_0000, 31));
        assert!(!bit_at(0x8000_0000, 0));
        assert!(bit_at(1, 0));
        assert!(!bit_at(1, 31));
    }

    #[test]
    fn folds_nand_of_two_known_constants() {
        let mut dag = Dag::new();
        let const0 = dag.intern_leaf(Label::const0()).unwrap();
        let const1 = dag.intern_leaf(Label::const1()).unwrap();
        let g = dag.nand(const1, const1);
        dag.bind_output(0, 0, g);

        let mut known = seed_known_constants(&dag);
        let folded = constant_fold(&mut dag, &mut known);
        assert_eq!(folded, 1);
        assert_eq!(dag.output_of(0, 0), Some(const0));
    }

    #[test]
    fn folds_via_short_circuit_even_with_an_unknown_operand() {
        let mut dag = Dag::new();
        let const0 = dag.intern_leaf(Label::const0()).unwrap();
        let message_bit = dag.intern_leaf(Label::input(0, 0)).unwrap();
        let g = dag.nand(message_bit, const0);
        dag.bind_output(0, 0, g);

        let mut known = seed_known_constants(&dag);
        let folded = constant_fold(&mut dag, &mut known);
        assert_eq!(folded, 1);
        let const1 = dag.id_of(&Label::const1()).unwrap();
        assert_eq!(dag.output_of(0, 0), Some(const1));
    }
}
