//! Pass C5: shared-inverter merging.
//!
//! A specialization of [`crate::rewrite::cse`] for the single-operand
//! case: every self-NAND gate (`a == b`) computes `NOT(a)`, so two
//! self-NAND gates sharing the same `a` are always redundant regardless
//! of what else has changed elsewhere in the DAG. Keying on the single
//! operand rather than the canonical pair makes this cheaper than a full
//! CSE pass; the engine runs it last in each round, after dead-code
//! elimination has already dropped whatever CSE and algebraic
//! simplification made unreachable.
//!
//! As with the other passes, the scan only reads `dag`: every merge is
//! queued and applied once the scan completes, so a merge decided for
//! one gate never changes what a later gate in the same scan sees
//! (`§5`).

use std::collections::HashMap;

use crate::dag::{Dag, Node, NodeId};

pub fn merge_shared_inverters(dag: &mut Dag) -> usize {
    let mut seen: HashMap<NodeId, NodeId> = HashMap::new();
    let mut merges: Vec<(NodeId, NodeId)> = Vec::new();

    for id in 0..dag.nb_nodes() as NodeId {
        if let Node::Gate { a, b } = dag.node(id) {
            if a != b {
                continue;
            }
            match seen.get(&a) {
                Some(&existing) => merges.push((id, existing)),
                None => {
                    seen.insert(a, id);
                }
            }
        }
    }

    for &(id, existing) in &merges {
        dag.replace(id, existing);
    }

    merges.len()
}
