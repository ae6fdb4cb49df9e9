//! Pass C4: dead code elimination.
//!
//! A thin wrapper around [`Dag::dead_code_eliminate`]: every rewrite pass
//! before this one works by retargeting references with [`Dag::replace`]
//! and leaves the old node in the arena, so the engine always runs this
//! pass last in a round to reclaim whatever became unreachable.

use crate::dag::Dag;

pub fn dead_code_eliminate(dag: &mut Dag) -> usize {
    dag.dead_code_eliminate()
}
