//! Pass C2: algebraic simplification.
//!
//! Structural NAND identities, independent of simulation:
//!
//! - Involution: `NAND(NOT(x), NOT(x)) = x`. Because every self-NAND gate
//!   (`a == b`) computes `NOT(a)`, this single shape also subsumes
//!   `AND(x, x) = x` and `OR(x, x) = x`, since this crate's `AND`/`OR`
//!   decompositions are themselves built from self-NAND gates (`§4.1`).
//! - Contradiction: `NAND(x, NOT(x)) = NAND(NOT(x), x) = 1`, since
//!   `x AND NOT(x)` is always false.
//! - One-sided constant-1: `NAND(x, CONST-1) = NOT(x)`. C1 already folds
//!   `NAND(x, CONST-0)` to the constant `1` regardless of `x` (the
//!   single-known-0 short circuit), but `NAND(x, CONST-1)` still varies
//!   with `x` and so is never constant-foldable — this identity is what
//!   actually realizes the spec's XOR-with-constant rewrite once C1 has
//!   cascaded through a synthesized XOR's internal `NAND(a,b)` gate: by
//!   the time this pass sees it, the detected shape has usually already
//!   collapsed past the literal 4-gate pattern into a chain of one-sided
//!   NANDs against a `CONST-1` leaf, which this identity peels off one
//!   gate per round, since a pass only ever matches against the DAG as
//!   it stood when the pass began (`§5`) — converging to the
//!   fully-reduced input or its negation over however many rounds the
//!   chain is long.
//! - XOR-with-constant (structural): the 4-gate XOR shape `out =
//!   NAND(NAND(a,t), NAND(b,t))` with `t = NAND(a,b)` (`§4.1`) collapses
//!   directly to the other input when one true input is `CONST-0`, or to
//!   its negation when one true input is `CONST-1` (`§4.2`). Kept as a
//!   direct structural match alongside the one-sided rule above so the
//!   rewrite still fires in a single step when `t` has not yet been
//!   folded away (e.g. when this pass runs standalone, ahead of C1).

use crate::dag::{Dag, Node, NodeId};
use crate::signal::Label;

/// What to do once the read-only scan below has decided a gate matches
/// one of the identities — queued rather than applied immediately so
/// that later gates visited in the same scan still see the
/// pre-rewrite DAG (`§5`).
enum Action {
    ReplaceWith(NodeId),
    ReplaceWithNot(NodeId),
}

/// Applies every identity above once per live gate, in definition order.
/// The scan itself only reads `dag`; every match is queued as an
/// [`Action`] and applied only after the scan completes, so a gate
/// rewritten here is not visible to a later gate examined in the same
/// pass (`§5`: "queue their effects ... and apply them atomically at
/// pass end, so that no pass ever observes a partially rewritten DAG").
/// Returns the number of gates rewritten.
pub fn algebraic_simplify(dag: &mut Dag) -> usize {
    let const0 = dag.id_of(&Label::const0());
    let const1 = dag.id_of(&Label::const1());
    let mut actions: Vec<(NodeId, Action)> = Vec::new();

    for id in 0..dag.nb_nodes() as NodeId {
        let Node::Gate { a, b } = dag.node(id) else {
            continue;
        };

        if a == b {
            if let Node::Gate { a: c, b: d } = dag.node(a) {
                if c == d {
                    actions.push((id, Action::ReplaceWith(c)));
                    continue;
                }
            }
        }

        if let (Node::Gate { a: ba, b: bb }, Some(const1)) = (dag.node(b), const1) {
            if ba == a && bb == a {
                actions.push((id, Action::ReplaceWith(const1)));
                continue;
            }
        }
        if let (Node::Gate { a: aa, b: ab }, Some(const1)) = (dag.node(a), const1) {
            if aa == b && ab == b {
                actions.push((id, Action::ReplaceWith(const1)));
                continue;
            }
        }

        if let Some((x, y)) = detect_xor_inputs(dag, a, b) {
            if Some(x) == const0 {
                actions.push((id, Action::ReplaceWith(y)));
                continue;
            } else if Some(y) == const0 {
                actions.push((id, Action::ReplaceWith(x)));
                continue;
            } else if Some(x) == const1 {
                actions.push((id, Action::ReplaceWithNot(y)));
                continue;
            } else if Some(y) == const1 {
                actions.push((id, Action::ReplaceWithNot(x)));
                continue;
            }
        }

        if Some(a) == const1 {
            actions.push((id, Action::ReplaceWithNot(b)));
        } else if Some(b) == const1 {
            actions.push((id, Action::ReplaceWithNot(a)));
        }
    }

    let rewrites = actions.len();
    for (id, action) in actions {
        match action {
            Action::ReplaceWith(target) => dag.replace(id, target),
            Action::ReplaceWithNot(other) => {
                let not_other = dag.nand(other, other);
                dag.replace(id, not_other);
            }
        }
    }

    rewrites
}

/// Given `out`'s two operands `n2`, `n3`, checks whether they match the
/// `NAND(a,t)`, `NAND(b,t)` shape of a synthesized XOR (`§4.1`) sharing a
/// common gate `t = NAND(a,b)`, and if so returns `(a, b)` — the XOR's
/// true inputs, as opposed to its internal plumbing. Structural match
/// only: it does not simulate, so it never misfires on a coincidental
/// NAND pair that merely shares an operand without `t` actually being
/// `NAND(a,b)`.
fn detect_xor_inputs(dag: &Dag, n2: NodeId, n3: NodeId) -> Option<(NodeId, NodeId)> {
    let Node::Gate { a: n2a, b: n2b } = dag.node(n2) else {
        return None;
    };
    let Node::Gate { a: n3a, b: n3b } = dag.node(n3) else {
        return None;
    };

    let (t, x, y) = if n2a == n3a {
        (n2a, n2b, n3b)
    } else if n2a == n3b {
        (n2a, n2b, n3a)
    } else if n2b == n3a {
        (n2b, n2a, n3b)
    } else if n2b == n3b {
        (n2b, n2a, n3a)
    } else {
        return None;
    };

    let Node::Gate { a: ta, b: tb } = dag.node(t) else {
        return None;
    };
    let matches = (ta == x && tb == y) || (ta == y && tb == x);
    matches.then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn involution_eliminates_double_negation() {
        let mut dag = Dag::new();
        let x = dag.intern_leaf(Label::new("x")).unwrap();
        let not_x = dag.nand(x, x);
        let not_not_x = dag.nand(not_x, not_x);
        dag.bind_output(0, 0, not_not_x);

        let rewrites = algebraic_simplify(&mut dag);
        assert_eq!(rewrites, 1);
        assert_eq!(dag.output_of(0, 0), Some(x));
    }

    #[test]
    fn nand_with_own_negation_is_always_true() {
        let mut dag = Dag::new();
        let x = dag.intern_leaf(Label::new("x")).unwrap();
        let const1 = dag.intern_leaf(Label::const1()).unwrap();
        let not_x = dag.nand(x, x);
        let g = dag.nand(x, not_x);
        dag.bind_output(0, 0, g);

        let rewrites = algebraic_simplify(&mut dag);
        assert_eq!(rewrites, 1);
        assert_eq!(dag.output_of(0, 0), Some(const1));
    }

    fn xor(dag: &mut Dag, a: NodeId, b: NodeId) -> NodeId {
        let t = dag.nand(a, b);
        let n2 = dag.nand(a, t);
        let n3 = dag.nand(b, t);
        dag.nand(n2, n3)
    }

    #[test]
    fn xor_with_const0_collapses_to_the_other_input() {
        let mut dag = Dag::new();
        let zero = dag.intern_leaf(Label::const0()).unwrap();
        let x = dag.intern_leaf(Label::new("x")).unwrap();
        let out = xor(&mut dag, x, zero);
        dag.bind_output(0, 0, out);

        let rewrites = algebraic_simplify(&mut dag);
        assert_eq!(rewrites, 1);
        assert_eq!(dag.output_of(0, 0), Some(x));
    }

    #[test]
    fn xor_with_const1_collapses_to_the_negated_other_input() {
        let mut dag = Dag::new();
        let one = dag.intern_leaf(Label::const1()).unwrap();
        let x = dag.intern_leaf(Label::new("x")).unwrap();
        let out = xor(&mut dag, x, one);
        dag.bind_output(0, 0, out);

        let rewrites = algebraic_simplify(&mut dag);
        assert_eq!(rewrites, 1);
        let result = dag.output_of(0, 0).unwrap();
        assert_eq!(dag.node(result), Node::Gate { a: x, b: x });
    }
}
