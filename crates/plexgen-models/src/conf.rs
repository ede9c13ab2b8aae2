//! Single-layer configuration model.
//!
//! A generation call unrolls the degree sequence into a stub list, pairs the shuffled stubs,
//! commits the simple pairings and then rewires away every self-loop and every duplicate.
//! When a rewire stalls the call restarts from a fresh shuffle on a fresh copy of the target,
//! so a failed call never leaves a partial graph behind.

use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::{Network, RngHandle};
use serde::{Deserialize, Serialize};

use crate::degree_sequence::DegreeSequence;
use crate::policy::{AttemptBudget, RewireFailure, RewirePolicy};
use crate::rewire::{eliminate_multi_edges, eliminate_self_loops};
use crate::stubs::{Pairing, StubPool};

/// Summary of a successful single-layer generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfModelReport {
    /// Nodes registered in the target.
    pub nodes: usize,
    /// Edges committed to the target.
    pub edges: usize,
    /// Self-loops removed by rewiring in the accepted realization.
    pub self_loops_resolved: usize,
    /// Duplicate-absorbing rewires performed in the accepted realization.
    pub multi_edges_resolved: usize,
    /// Sampled rewire candidates over all realizations, rejected ones included.
    pub rewire_attempts: u64,
    /// Fresh reshuffles needed before a realization succeeded.
    pub restarts: u32,
}

/// Fills `net` with a simple graph whose degrees match `degs` exactly.
///
/// Node `i` of the sequence becomes [`NodeId`](plexgen_core::NodeId) `i`; degree-zero nodes
/// are registered as well. `net` must not hold any edge. On error `net` is left untouched.
///
/// # Errors
///
/// * [`PlexError::DegreeSequence`] when the degree sum is odd or does not fit in `usize`.
/// * [`PlexError::Network`] when `net` already has edges or rejects an update.
/// * [`PlexError::RewireExhaustion`] when the restarts or the deadline of `policy` run out.
pub fn generate_configuration_model<N>(
    net: &mut N,
    degs: &DegreeSequence,
    policy: &RewirePolicy,
    rng: &mut RngHandle,
) -> Result<ConfModelReport, PlexError>
where
    N: Network + Clone,
{
    degs.validate()?;
    if net.edge_count() > 0 {
        return Err(PlexError::Network(
            ErrorInfo::new("target-not-empty", "target network already holds edges")
                .with_context("edges", net.edge_count())
                .with_hint("generate into a network without edges"),
        ));
    }

    let pristine = StubPool::from_degree_sequence(degs);
    let mut budget = AttemptBudget::start(policy);
    let mut restarts = 0u32;
    loop {
        let mut trial = net.clone();
        let mut pool = pristine.clone();
        match realize(&mut pool, &mut trial, &mut budget, rng) {
            Ok(mut report) => {
                report.rewire_attempts = budget.total_attempts();
                report.restarts = restarts;
                *net = trial;
                log::debug!(
                    "configuration model realized {} nodes and {} edges ({} self-loops, {} duplicate rewires, {} restarts)",
                    report.nodes,
                    report.edges,
                    report.self_loops_resolved,
                    report.multi_edges_resolved,
                    report.restarts
                );
                return Ok(report);
            }
            Err(RewireFailure::Fatal(err)) => return Err(err),
            Err(RewireFailure::Stalled {
                phase,
                reason,
                attempts,
            }) => {
                if restarts >= policy.max_restarts {
                    let (code, message) = if policy.max_restarts == 0 {
                        (reason.code(), "rewire stalled and restarts are disabled")
                    } else {
                        ("restart-budget", "every restart stalled")
                    };
                    return Err(PlexError::RewireExhaustion(
                        ErrorInfo::new(code, message)
                            .with_context("phase", phase)
                            .with_context("reason", reason.code())
                            .with_context("attempts", budget.total_attempts())
                            .with_context("restarts", restarts)
                            .with_hint("raise max_attempts or max_restarts in the rewire policy"),
                    ));
                }
                restarts += 1;
                log::debug!(
                    "{} rewire stalled ({}) after {} attempts, restart {} of {}",
                    phase,
                    reason.code(),
                    attempts,
                    restarts,
                    policy.max_restarts
                );
                budget.check_deadline(phase)?;
            }
        }
    }
}

/// One realization: register nodes, pair the shuffled stubs, then rewire.
fn realize<N: Network + ?Sized>(
    pool: &mut StubPool,
    net: &mut N,
    budget: &mut AttemptBudget,
    rng: &mut RngHandle,
) -> Result<ConfModelReport, RewireFailure> {
    for node in pool.node_ids() {
        net.add_node(node)?;
    }
    pool.shuffle(rng);
    let mut pairing = Pairing::classify(pool, net)?;
    let self_loops_resolved = eliminate_self_loops(pool, &pairing, net, budget, rng)?;
    let multi_edges_resolved = eliminate_multi_edges(pool, &mut pairing, net, budget, rng)?;
    Ok(ConfModelReport {
        nodes: pool.node_count(),
        edges: net.edge_count(),
        self_loops_resolved,
        multi_edges_resolved,
        ..ConfModelReport::default()
    })
}
