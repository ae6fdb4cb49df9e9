//! The NAND DAG: a dense arena of gate nodes plus the label, fan-out, and
//! output-alias bookkeeping the rewrite engine needs to stay consistent
//! across passes.
//!
//! Node ids are assigned monotonically in definition order, and definition
//! order is always a valid topological order (`§3` acyclicity invariant).
//! Leaves (constants, inputs, and bit-expanded constants) are interned once
//! up front and are never removed; gates are created by the synthesizer or
//! the rewrite engine and may be deleted by dead-code elimination.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Error, Result};
use crate::signal::Label;

/// An index into the node arena. Stable for the lifetime of a [`Dag`]
/// value, but invalidated by any operation that compacts the arena
/// ([`Dag::dead_code_eliminate`]) — those operations return a translation
/// table for callers that must track old ids (output bindings, alias
/// tables kept outside the DAG).
pub type NodeId = u32;

/// A node is either a leaf (no defining NAND — a constant, primary input,
/// or bit-expanded constant) or a gate defined as `NAND(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf,
    Gate { a: NodeId, b: NodeId },
}

/// A directed acyclic graph of two-input NAND gates over a fixed leaf set.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    labels: Vec<Label>,
    label_index: HashMap<Label, NodeId>,
    nodes: Vec<Node>,
    fanout: Vec<HashSet<NodeId>>,
    cse: HashMap<(NodeId, NodeId), NodeId>,
    output_alias: BTreeMap<(u8, u8), NodeId>,
    next_gate_ordinal: u64,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of gate nodes currently live (leaves excluded). This is the
    /// "gate count" the spec's calibration figures (`§8`) refer to.
    pub fn nb_gates(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Gate { .. }))
            .count()
    }

    pub fn label(&self, id: NodeId) -> &Label {
        &self.labels[id as usize]
    }

    pub fn id_of(&self, label: &Label) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id as usize]
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id as usize], Node::Leaf)
    }

    pub fn fanout(&self, id: NodeId) -> &HashSet<NodeId> {
        &self.fanout[id as usize]
    }

    pub fn output_alias(&self) -> &BTreeMap<(u8, u8), NodeId> {
        &self.output_alias
    }

    pub fn output_of(&self, word: u8, bit: u8) -> Option<NodeId> {
        self.output_alias.get(&(word, bit)).copied()
    }

    /// Interns a leaf signal (constant, input, or bit-expanded constant)
    /// under `label`. Fatal if the label is already defined — every
    /// signal label must be unique within a circuit (`§3`).
    pub fn intern_leaf(&mut self, label: Label) -> Result<NodeId> {
        if self.label_index.contains_key(&label) {
            return Err(Error::DuplicateLabel {
                file: "<synthesis>".to_string(),
                label: label.0,
                first_line: 0,
                second_line: 0,
            });
        }
        let id = self.push_node(label.clone(), Node::Leaf);
        Ok(id)
    }

    /// Interns the 8704 reserved bit-level leaves every circuit shares
    /// regardless of message or constants file: `CONST-0`/`CONST-1`, the
    /// 512 `INPUT-Wi-Bj` bits, the 2048 `K-k-Bj` round-constant bits, and
    /// the 256 `H-INIT-h-Bj` initial-hash bits (`§3`). Shared by the
    /// synthesizer and the `nands.txt` parser so both start from an
    /// identical leaf set.
    pub fn intern_reserved_leaves(&mut self) -> Result<()> {
        self.intern_leaf(Label::const0())?;
        self.intern_leaf(Label::const1())?;
        for word in 0..16u8 {
            for bit in 0..32u8 {
                self.intern_leaf(Label::input(word, bit))?;
            }
        }
        for index in 0..64u8 {
            for bit in 0..32u8 {
                self.intern_leaf(Label::round_constant(index, bit))?;
            }
        }
        for index in 0..8u8 {
            for bit in 0..32u8 {
                self.intern_leaf(Label::initial_hash(index, bit))?;
            }
        }
        Ok(())
    }

    /// Defines a gate under a caller-chosen `label` rather than an
    /// auto-generated one, for contexts where the label is meaningful
    /// (parsing `nands.txt`, materializing `OUTPUT-Wi-Bj` pass-throughs
    /// for serialization). Fatal if `label` is already defined.
    ///
    /// Unlike [`Dag::nand`], this never returns an existing node for an
    /// already-computed `(a, b)` pair — the caller asked for this exact
    /// label to exist. The CSE table only records the new node if no
    /// entry for `(a, b)` exists yet, so a later [`Dag::nand`] call for
    /// the same pair still resolves to whichever node defined it first.
    pub fn define_gate(&mut self, label: Label, a: NodeId, b: NodeId) -> Result<NodeId> {
        if self.label_index.contains_key(&label) {
            return Err(Error::DuplicateLabel {
                file: "<nands.txt>".to_string(),
                label: label.0,
                first_line: 0,
                second_line: 0,
            });
        }
        let id = self.push_node(label, Node::Gate { a, b });
        self.fanout[a as usize].insert(id);
        self.fanout[b as usize].insert(id);
        let key = if a <= b { (a, b) } else { (b, a) };
        self.cse.entry(key).or_insert(id);
        Ok(id)
    }

    /// Materializes a literal `NAND`-defined gate labeled `OUTPUT-Wi-Bj`
    /// for every bound output that does not already have one, as a
    /// double-negation pass-through of its defining node. `nands.txt`
    /// requires the output labels to appear as ordinary gate-defining
    /// lines (`§6`); internally the DAG still treats outputs as aliases
    /// to their defining node (`§9`), which [`Dag::output_alias`]
    /// continues to expose unchanged. Idempotent: calling this twice
    /// does not duplicate the pass-through gates.
    pub fn materialize_outputs(&mut self) -> Result<()> {
        let entries: Vec<((u8, u8), NodeId)> = self
            .output_alias
            .iter()
            .map(|(&k, &v)| (k, v))
            .collect();
        for ((word, bit), node) in entries {
            let label = Label::output(word, bit);
            if self.label_index.contains_key(&label) {
                continue;
            }
            let inv = self.nand(node, node);
            self.define_gate(label, inv, inv)?;
        }
        Ok(())
    }

    /// Returns the node computing `NAND(a, b)`, creating it if no such
    /// gate exists yet. Canonicalizes `(a, b)` to `(min, max)` by node-id
    /// before lookup, so the commutativity of NAND is honored by
    /// construction (`§4.1` CSE-on-emission, `§9` commutative-CSE note).
    pub fn nand(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&existing) = self.cse.get(&key) {
            return existing;
        }
        let ordinal = self.next_gate_ordinal;
        self.next_gate_ordinal += 1;
        let label = Label::new(format!("g{ordinal}"));
        let id = self.push_node(label, Node::Gate { a, b });
        self.fanout[a as usize].insert(id);
        self.fanout[b as usize].insert(id);
        self.cse.insert(key, id);
        id
    }

    fn push_node(&mut self, label: Label, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.labels.push(label.clone());
        self.label_index.insert(label, id);
        self.nodes.push(node);
        self.fanout.push(HashSet::new());
        id
    }

    /// Binds output `(word, bit)` to `node`, retargeting any existing
    /// binding. Outputs are never deleted, only retargeted (`§3`
    /// lifecycle rule).
    pub fn bind_output(&mut self, word: u8, bit: u8, node: NodeId) {
        self.output_alias.insert((word, bit), node);
    }

    /// Replaces every consumer reference to `old` with `new`, and
    /// retargets any output alias pointing at `old`. Does not remove
    /// `old` from the arena — that is [`Dag::dead_code_eliminate`]'s job,
    /// once `old` genuinely has no remaining consumers or output binding.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        for v in self.output_alias.values_mut() {
            if *v == old {
                *v = new;
            }
        }
        let consumers: Vec<NodeId> = self.fanout[old as usize].drain().collect();
        for consumer in consumers {
            if let Node::Gate { a, b } = &mut self.nodes[consumer as usize] {
                if *a == old {
                    *a = new;
                }
                if *b == old {
                    *b = new;
                }
            }
            self.fanout[new as usize].insert(consumer);
        }
    }

    /// Returns whether `id` is still reachable from some output, some
    /// remaining consumer, or is a leaf. Gates that fail this check are
    /// removed by [`Dag::dead_code_eliminate`].
    fn has_consumers_or_is_output(&self, id: NodeId) -> bool {
        if self.is_leaf(id) {
            return true;
        }
        if !self.fanout[id as usize].is_empty() {
            return true;
        }
        self.output_alias.values().any(|&v| v == id)
    }

    /// Marks every node reachable from an output binding (or a leaf) and
    /// removes the rest, compacting the arena and remapping every
    /// surviving id. Returns the number of gates removed.
    ///
    /// Pass C4 in the rewrite engine's terminology (`§4.2`).
    pub fn dead_code_eliminate(&mut self) -> usize {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeId> = self.output_alias.values().copied().collect();
        for (id, node) in self.nodes.iter().enumerate() {
            if matches!(node, Node::Leaf) {
                visited[id] = true;
            }
        }
        while let Some(id) = stack.pop() {
            let idx = id as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            if let Node::Gate { a, b } = self.nodes[idx] {
                stack.push(a);
                stack.push(b);
            }
        }

        let removed = visited.iter().filter(|&&v| !v).count();
        if removed == 0 {
            return 0;
        }

        let keep: Vec<NodeId> = (0..self.nodes.len() as NodeId)
            .filter(|&id| visited[id as usize])
            .collect();
        self.remap(&keep);
        removed
    }

    /// Rebuilds the arena keeping only `keep`, in the given order, and
    /// remapping every stored `NodeId` (gate operands, fanout sets, the
    /// CSE table, and output aliases) through the induced translation.
    /// Tie-breaking between nodes of otherwise-equal standing always
    /// prefers the lower original node-id, which `keep`'s caller-supplied
    /// order already encodes (`§9`, reproducibility note).
    fn remap(&mut self, keep: &[NodeId]) {
        let mut translation = vec![u32::MAX; self.nodes.len()];
        for (new_id, &old_id) in keep.iter().enumerate() {
            translation[old_id as usize] = new_id as NodeId;
        }

        let mut new_labels = Vec::with_capacity(keep.len());
        let mut new_nodes = Vec::with_capacity(keep.len());
        let mut new_fanout = Vec::with_capacity(keep.len());
        for &old_id in keep {
            new_labels.push(self.labels[old_id as usize].clone());
            let node = match self.nodes[old_id as usize] {
                Node::Leaf => Node::Leaf,
                Node::Gate { a, b } => Node::Gate {
                    a: translation[a as usize],
                    b: translation[b as usize],
                },
            };
            new_nodes.push(node);
            let remapped_fanout: HashSet<NodeId> = self.fanout[old_id as usize]
                .iter()
                .filter_map(|&c| {
                    let t = translation[c as usize];
                    (t != u32::MAX).then_some(t)
                })
                .collect();
            new_fanout.push(remapped_fanout);
        }

        let mut new_label_index = HashMap::with_capacity(new_labels.len());
        for (id, label) in new_labels.iter().enumerate() {
            new_label_index.insert(label.clone(), id as NodeId);
        }

        let new_cse: HashMap<(NodeId, NodeId), NodeId> = self
            .cse
            .iter()
            .filter_map(|(&(a, b), &g)| {
                let ta = translation[a as usize];
                let tb = translation[b as usize];
                let tg = translation[g as usize];
                (ta != u32::MAX && tb != u32::MAX && tg != u32::MAX).then_some(((ta, tb), tg))
            })
            .collect();

        for v in self.output_alias.values_mut() {
            *v = translation[*v as usize];
        }

        self.labels = new_labels;
        self.label_index = new_label_index;
        self.nodes = new_nodes;
        self.fanout = new_fanout;
        self.cse = new_cse;
    }

    /// Checks the definition-before-use and acyclicity invariant: every
    /// gate's operands must have a strictly lower node-id than the gate
    /// itself.
    pub fn check_topo_order(&self) -> Result<()> {
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Gate { a, b } = *node {
                if a >= id as NodeId || b >= id as NodeId {
                    return Err(Error::CycleIntroduced {
                        label: self.labels[id].0.clone(),
                        detail: format!(
                            "operand id {a} or {b} is not strictly less than {id}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that the output alias set covers exactly
    /// `{(i, j) | 0<=i<8, 0<=j<32}` and nothing else.
    pub fn check_output_cardinality(&self) -> Result<()> {
        if self.output_alias.len() != 256 {
            return Err(Error::OutputCardinality {
                found: self.output_alias.len(),
            });
        }
        for word in 0..8u8 {
            for bit in 0..32u8 {
                if !self.output_alias.contains_key(&(word, bit)) {
                    return Err(Error::OutputCardinality {
                        found: self.output_alias.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Iterates live gates in definition order as `(label, a_label,
    /// b_label)` triples, suitable for serialization to `nands.txt`.
    pub fn iter_gate_definitions(&self) -> impl Iterator<Item = (&Label, &Label, &Label)> {
        self.nodes.iter().enumerate().filter_map(move |(id, n)| {
            if let Node::Gate { a, b } = *n {
                Some((&self.labels[id], &self.labels[a as usize], &self.labels[b as usize]))
            } else {
                None
            }
        })
    }

    pub fn assert_consistent(&self) {
        debug_assert!(self.check_topo_order().is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(dag: &mut Dag, name: &str) -> NodeId {
        dag.intern_leaf(Label::new(name)).unwrap()
    }

    #[test]
    fn nand_deduplicates_commutatively() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, "a");
        let b = leaf(&mut dag, "b");
        let g1 = dag.nand(a, b);
        let g2 = dag.nand(b, a);
        assert_eq!(g1, g2);
        assert_eq!(dag.nb_gates(), 1);
    }

    #[test]
    fn replace_redirects_consumers_and_outputs() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, "a");
        let b = leaf(&mut dag, "b");
        let c = leaf(&mut dag, "c");
        let g = dag.nand(a, b);
        let h = dag.nand(g, c);
        dag.bind_output(0, 0, h);

        dag.replace(g, a);
        if let Node::Gate { a: ha, b: hb } = dag.node(h) {
            assert!(ha == a || hb == a);
        } else {
            panic!("expected gate");
        }
    }

    #[test]
    fn dead_code_elimination_keeps_only_reachable_gates() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, "a");
        let b = leaf(&mut dag, "b");
        let live = dag.nand(a, b);
        let _dead = dag.nand(b, b);
        dag.bind_output(0, 0, live);

        let removed = dag.dead_code_eliminate();
        assert_eq!(removed, 1);
        assert_eq!(dag.nb_gates(), 1);
        dag.check_topo_order().unwrap();
    }

    #[test]
    fn topo_check_rejects_forward_references() {
        let mut dag = Dag::new();
        let a = leaf(&mut dag, "a");
        let _b = leaf(&mut dag, "b");
        dag.nand(a, a);
        assert!(dag.check_topo_order().is_ok());
    }
}
