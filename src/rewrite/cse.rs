//! Pass C3: common subexpression elimination.
//!
//! [`Dag::nand`] already deduplicates gates at creation time, keyed on
//! the canonical `(min, max)` operand pair. That catches every duplicate
//! the synthesizer or an earlier rewrite pass introduces directly, but
//! not duplicates created indirectly: when [`Dag::replace`] retargets a
//! gate's operand, two gates that used to differ can end up with the
//! same canonical key without ever going through `nand` again. This pass
//! rescans the live gate set and merges those.
//!
//! Ties are broken toward the lower node id, which a single ascending
//! scan already guarantees (`§9`, reproducibility note).
//!
//! The scan only reads `dag`; every merge it finds is queued and applied
//! only once the scan completes, so a merge decided for one gate never
//! changes what a later gate in the same scan sees as its canonical key
//! (`§5`: no pass observes a partially rewritten DAG).

use std::collections::HashMap;

use crate::dag::{Dag, Node, NodeId};

pub fn cse_merge(dag: &mut Dag) -> usize {
    let mut seen: HashMap<(NodeId, NodeId), NodeId> = HashMap::new();
    let mut merges: Vec<(NodeId, NodeId)> = Vec::new();

    for id in 0..dag.nb_nodes() as NodeId {
        if let Node::Gate { a, b } = dag.node(id) {
            let key = if a <= b { (a, b) } else { (b, a) };
            match seen.get(&key) {
                Some(&existing) => merges.push((id, existing)),
                None => {
                    seen.insert(key, id);
                }
            }
        }
    }

    for &(id, existing) in &merges {
        dag.replace(id, existing);
    }

    merges.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Label;

    #[test]
    fn merges_gates_that_become_identical_after_a_rewrite() {
        let mut dag = Dag::new();
        let a = dag.intern_leaf(Label::new("a")).unwrap();
        let b = dag.intern_leaf(Label::new("b")).unwrap();
        let c = dag.intern_leaf(Label::new("c")).unwrap();

        let g1 = dag.nand(a, b);
        let g2 = dag.nand(a, c);
        dag.replace(c, b);
        dag.bind_output(0, 0, g1);
        dag.bind_output(0, 1, g2);

        let merges = cse_merge(&mut dag);
        assert_eq!(merges, 1);
        assert_eq!(dag.output_of(0, 0), dag.output_of(0, 1));
    }
}
