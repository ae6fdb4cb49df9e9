//! The rewrite engine (`R`): repeatedly applies passes C1–C5 until none
//! of them change the circuit, or a round budget is exhausted (`§4.2`).
//!
//! Passes run in a fixed order each round, matching the engine's pass
//! numbering: constant folding (C1), algebraic simplification (C2),
//! common subexpression elimination (C3), dead code elimination (C4),
//! and shared-inverter merging (C5). A round that makes zero rewrites
//! across all five passes is a fixed point.
//!
//! The known-constant map C1 seeds itself from is rebuilt at the start of
//! every round rather than threaded through: [`Dag::dead_code_eliminate`]
//! compacts the arena and renumbers every surviving node, which would
//! invalidate a map of [`crate::dag::NodeId`]s computed before the
//! previous round's C4 ran.

pub mod algebraic;
pub mod cse;
pub mod dce;
pub mod fold;
pub mod inverter;

use log::{debug, warn};

use crate::dag::Dag;

/// Upper bound on optimization rounds before the engine gives up and logs
/// a did-not-converge warning rather than looping forever on a circuit
/// that (by construction) should never fail to reach a fixed point.
pub const DEFAULT_MAX_ROUNDS: usize = 64;

/// Summary of one [`Engine::optimize`] run, surfaced by the `optimize`
/// CLI subcommand (`§6`).
#[derive(Debug, Clone, Copy)]
pub struct OptimizeReport {
    pub rounds_run: usize,
    pub initial_gates: usize,
    pub final_gates: usize,
    pub converged: bool,
}

pub struct Engine {
    max_rounds: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(max_rounds: usize) -> Self {
        Engine { max_rounds }
    }

    /// Runs passes C1–C5 to a fixed point (or until `max_rounds` is
    /// exhausted), mutating `dag` in place.
    pub fn optimize(&self, dag: &mut Dag) -> OptimizeReport {
        let initial_gates = dag.nb_gates();
        let mut rounds_run = 0;
        let mut converged = false;

        loop {
            rounds_run += 1;

            let mut known = fold::seed_known_constants(dag);
            let folded = fold::constant_fold(dag, &mut known);
            let algebraic = algebraic::algebraic_simplify(dag);
            let cse_merges = cse::cse_merge(dag);
            let removed = dce::dead_code_eliminate(dag);
            let inverter_merges = inverter::merge_shared_inverters(dag);

            debug!(
                "optimize round {rounds_run}: folded={folded} algebraic={algebraic} \
                 cse={cse_merges} dce={removed} inverter={inverter_merges} gates={}",
                dag.nb_gates()
            );

            if folded == 0 && algebraic == 0 && cse_merges == 0 && removed == 0 && inverter_merges == 0 {
                converged = true;
                break;
            }
            if rounds_run >= self.max_rounds {
                warn!(
                    "rewrite engine did not converge within {} rounds; stopping with {} gates",
                    self.max_rounds,
                    dag.nb_gates()
                );
                break;
            }
        }

        dag.assert_consistent();
        OptimizeReport {
            rounds_run,
            initial_gates,
            final_gates: dag.nb_gates(),
            converged,
        }
    }
}
