//! Bit-level NAND decompositions of the word-op opcodes (`§4.1`).
//!
//! Every function here takes and returns [`NodeId`]s already interned in
//! the [`Dag`] and only ever calls [`Dag::nand`], so every gate it creates
//! goes through the DAG's CSE-on-emission automatically — two calls that
//! happen to decompose to the same `NAND(a, b)` collapse to one node
//! without this module doing anything special.

use crate::dag::{Dag, NodeId};

pub fn not_gate(dag: &mut Dag, a: NodeId) -> NodeId {
    dag.nand(a, a)
}

pub fn and_gate(dag: &mut Dag, a: NodeId, b: NodeId) -> NodeId {
    let n = dag.nand(a, b);
    dag.nand(n, n)
}

pub fn or_gate(dag: &mut Dag, a: NodeId, b: NodeId) -> NodeId {
    let na = not_gate(dag, a);
    let nb = not_gate(dag, b);
    dag.nand(na, nb)
}

/// Four-NAND XOR: `n1 = NAND(a,b); n2 = NAND(a,n1); n3 = NAND(b,n1); XOR =
/// NAND(n2,n3)`.
pub fn xor_gate(dag: &mut Dag, a: NodeId, b: NodeId) -> NodeId {
    let n1 = dag.nand(a, b);
    let n2 = dag.nand(a, n1);
    let n3 = dag.nand(b, n1);
    dag.nand(n2, n3)
}

/// 2:1 mux: `CH(e,f,g) = NAND(NAND(e,f), NAND(NOT(e),g))`, 4 gates.
pub fn ch_gate(dag: &mut Dag, e: NodeId, f: NodeId, g: NodeId) -> NodeId {
    let not_e = not_gate(dag, e);
    let t1 = dag.nand(e, f);
    let t2 = dag.nand(not_e, g);
    dag.nand(t1, t2)
}

/// OR-form majority: `x = NAND(NAND(a,b), NAND(a,c)); MAJ = NAND(NOT(x),
/// NAND(b,c))`, 6 gates when none of its three sub-NANDs are already
/// live elsewhere in the DAG.
pub fn maj_gate(dag: &mut Dag, a: NodeId, b: NodeId, c: NodeId) -> NodeId {
    let g1 = dag.nand(a, b);
    let g2 = dag.nand(a, c);
    let x = dag.nand(g1, g2);
    let not_x = not_gate(dag, x);
    let g3 = dag.nand(b, c);
    dag.nand(not_x, g3)
}

pub struct FullAdderResult {
    pub sum: NodeId,
    pub carry_out: NodeId,
}

/// A one-bit full adder built from two 4-gate XORs and a majority for the
/// carry: `sum = a XOR b XOR cin`, `carry_out = MAJ(a, b, cin)`. The
/// first XOR's `NAND(a,b)` gate and the majority's own `NAND(a,b)` sub-gate
/// are structurally identical, so the DAG's CSE-on-emission collapses them
/// into one — 8 gates for the two XORs plus 5 new gates for the majority,
/// 13 in total, matching the spec's optimized adder.
pub fn full_adder(dag: &mut Dag, a: NodeId, b: NodeId, carry_in: NodeId) -> FullAdderResult {
    let s1 = xor_gate(dag, a, b);
    let sum = xor_gate(dag, s1, carry_in);
    let carry_out = maj_gate(dag, a, b, carry_in);
    FullAdderResult { sum, carry_out }
}

/// 32-bit modular addition as a ripple-carry chain of 32 [`full_adder`]
/// calls. Bit arrays are indexed `[bit 0 (LSB) ..= bit 31 (MSB)]` (`§3`,
/// `§6`: "`-B0` is LSB"), so the carry chain runs from index 0 up to index
/// 31; the final carry out of bit 31 is discarded, giving addition modulo
/// 2^32.
pub fn add32(dag: &mut Dag, a: &[NodeId; 32], b: &[NodeId; 32], const0: NodeId) -> [NodeId; 32] {
    let mut sum = [0 as NodeId; 32];
    let mut carry = const0;
    for i in 0..32usize {
        let result = full_adder(dag, a[i], b[i], carry);
        sum[i] = result.sum;
        carry = result.carry_out;
    }
    sum
}

/// Right-rotates a 32-bit value by `n` bits. Pure rewiring: no gates are
/// created, since a rotation only ever renames which signal feeds which
/// output position. `bits` is indexed `[bit 0 (LSB) ..= bit 31 (MSB)]`, so
/// output bit `i` takes the value input bit `(i + n) mod 32` held, matching
/// `u32::rotate_right`.
pub fn rotr_nodes(bits: &[NodeId; 32], n: u32) -> [NodeId; 32] {
    let n = (n % 32) as usize;
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = bits[(i + n) % 32];
    }
    out
}

/// Right-shifts a 32-bit value by `n` bits, filling vacated high-order
/// positions (the top `n` bits, closest to the MSB) with `const0`. Also
/// pure rewiring except for the constant fill.
pub fn shr_nodes(bits: &[NodeId; 32], n: u32, const0: NodeId) -> [NodeId; 32] {
    let n = n as usize;
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = if i + n < 32 { bits[i + n] } else { const0 };
    }
    out
}

pub fn and32(dag: &mut Dag, a: &[NodeId; 32], b: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = and_gate(dag, a[i], b[i]);
    }
    out
}

pub fn or32(dag: &mut Dag, a: &[NodeId; 32], b: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = or_gate(dag, a[i], b[i]);
    }
    out
}

pub fn xor32(dag: &mut Dag, a: &[NodeId; 32], b: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = xor_gate(dag, a[i], b[i]);
    }
    out
}

pub fn not32(dag: &mut Dag, a: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = not_gate(dag, a[i]);
    }
    out
}

pub fn ch32(dag: &mut Dag, e: &[NodeId; 32], f: &[NodeId; 32], g: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = ch_gate(dag, e[i], f[i], g[i]);
    }
    out
}

pub fn maj32(dag: &mut Dag, x: &[NodeId; 32], y: &[NodeId; 32], z: &[NodeId; 32]) -> [NodeId; 32] {
    let mut out = [0 as NodeId; 32];
    for i in 0..32usize {
        out[i] = maj_gate(dag, x[i], y[i], z[i]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Label;

    fn leaf(dag: &mut Dag, v: bool) -> NodeId {
        let label = Label::new(if v { "one" } else { "zero" });
        dag.id_of(&label).unwrap_or_else(|| dag.intern_leaf(label).unwrap())
    }

    #[test]
    fn not_gate_is_self_nand() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, true);
        let n = not_gate(&mut dag, a);
        assert_eq!(dag.node(n), crate::dag::Node::Gate { a, b: a });
    }

    #[test]
    fn xor_gate_reuses_shared_subexpressions() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, true);
        let b = leaf(&mut dag, false);
        let x1 = xor_gate(&mut dag, a, b);
        let before = dag.nb_gates();
        let x2 = xor_gate(&mut dag, a, b);
        assert_eq!(x1, x2);
        assert_eq!(dag.nb_gates(), before);
    }

    #[test]
    fn rotr_by_zero_is_identity() {
        let bits: Vec<NodeId> = (0..32u32).collect();
        let bits: [NodeId; 32] = bits.try_into().unwrap();
        let out = rotr_nodes(&bits, 0);
        assert_eq!(out, bits);
    }

    #[test]
    fn rotr_by_32_is_identity() {
        let bits: Vec<NodeId> = (0..32u32).collect();
        let bits: [NodeId; 32] = bits.try_into().unwrap();
        let out = rotr_nodes(&bits, 32);
        assert_eq!(out, bits);
    }

    #[test]
    fn shr_fills_high_bits_with_const0() {
        let mut dag = Dag::new();
        let zero = leaf(&mut dag, false);
        let bits: Vec<NodeId> = (100..132u32).collect();
        let bits: [NodeId; 32] = bits.try_into().unwrap();
        let out = shr_nodes(&bits, 3, zero);
        assert_eq!(out[29], zero);
        assert_eq!(out[30], zero);
        assert_eq!(out[31], zero);
        assert_eq!(out[0], bits[3]);
        assert_eq!(out[28], bits[31]);
    }

    /// Evaluates a single boolean node by walking its defining NANDs.
    /// Good enough for the small gate-local truth tables below; the real
    /// evaluator lives in `crate::eval` and walks the whole DAG once.
    fn eval_bool(dag: &Dag, id: NodeId) -> bool {
        match dag.node(id) {
            crate::dag::Node::Leaf => {
                dag.label(id).as_str() == "one"
            }
            crate::dag::Node::Gate { a, b } => !(eval_bool(dag, a) && eval_bool(dag, b)),
        }
    }

    #[test]
    fn ch_gate_matches_textbook_formula_and_costs_four_gates() {
        for e in [false, true] {
            for f in [false, true] {
                for g in [false, true] {
                    let mut dag = Dag::new();
                    let ei = leaf(&mut dag, e);
                    let fi = leaf(&mut dag, f);
                    let gi = leaf(&mut dag, g);
                    let before = dag.nb_gates();
                    let out = ch_gate(&mut dag, ei, fi, gi);
                    assert_eq!(dag.nb_gates() - before, 4);
                    let expected = (e && f) || (!e && g);
                    assert_eq!(eval_bool(&dag, out), expected);
                }
            }
        }
    }

    #[test]
    fn maj_gate_matches_textbook_formula_and_costs_six_gates() {
        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    let mut dag = Dag::new();
                    let ai = leaf(&mut dag, a);
                    let bi = leaf(&mut dag, b);
                    let ci = leaf(&mut dag, c);
                    let before = dag.nb_gates();
                    let out = maj_gate(&mut dag, ai, bi, ci);
                    assert_eq!(dag.nb_gates() - before, 6);
                    let expected = (a && b) || (a && c) || (b && c);
                    assert_eq!(eval_bool(&dag, out), expected);
                }
            }
        }
    }

    #[test]
    fn full_adder_matches_arithmetic_and_costs_thirteen_gates() {
        for a in [false, true] {
            for b in [false, true] {
                for cin in [false, true] {
                    let mut dag = Dag::new();
                    let ai = leaf(&mut dag, a);
                    let bi = leaf(&mut dag, b);
                    let ci = leaf(&mut dag, cin);
                    let before = dag.nb_gates();
                    let result = full_adder(&mut dag, ai, bi, ci);
                    assert_eq!(dag.nb_gates() - before, 13);

                    let total = a as u8 + b as u8 + cin as u8;
                    assert_eq!(eval_bool(&dag, result.sum), total % 2 == 1);
                    assert_eq!(eval_bool(&dag, result.carry_out), total >= 2);
                }
            }
        }
    }
}
