//! Local rewires that remove self-loops and duplicate pairings without changing any degree.
//!
//! Both eliminators sample two slots uniformly from the whole stub list and accept the
//! candidate only when the rewire leaves the network simple. Slots holding a pair from the
//! multi-edge set are never rewired.

use std::collections::{BTreeMap, BTreeSet};

use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::{ordered_pair, Network, NodeId, RngHandle};
use rand::seq::index;

use crate::policy::{AttemptBudget, Phase, RewireFailure, StallReason};
use crate::stubs::{all_distinct, Pair, Pairing, StubPool};

/// Distinct nodes touched by a self-loop rewire.
const SELF_LOOP_REWIRE_NODES: usize = 5;
/// Distinct nodes touched by a multi-edge rewire.
const MULTI_EDGE_REWIRE_NODES: usize = 6;

/// Resolves every self-loop with a three-edge rewire. Returns the number resolved.
///
/// For a loop at `n0` and sampled slots `(n2, n3)` and `(n4, n5)` the rewire replaces
/// `n0-n0`, `n2-n3` and `n4-n5` by `n0-n2`, `n0-n4` and `n3-n5`.
pub(crate) fn eliminate_self_loops<N: Network + ?Sized>(
    pool: &mut StubPool,
    pairing: &Pairing,
    net: &mut N,
    budget: &mut AttemptBudget,
    rng: &mut RngHandle,
) -> Result<usize, RewireFailure> {
    let loops = pairing.self_loop_count();
    if loops == 0 {
        return Ok(0);
    }
    ensure_feasible(pool, Phase::SelfLoop, SELF_LOOP_REWIRE_NODES, 3)?;

    let multi_edges = &pairing.multi_edges;
    for (&n0, positions) in &pairing.self_edges {
        for &si in positions {
            let attempts = budget.retry(Phase::SelfLoop, || {
                try_self_loop_rewire(pool, multi_edges, net, rng, n0, si)
            })?;
            log::trace!(
                "resolved self-loop at node {} (slot {}) after {} attempts",
                n0.as_raw(),
                si / 2,
                attempts
            );
        }
    }
    Ok(loops)
}

fn try_self_loop_rewire<N: Network + ?Sized>(
    pool: &mut StubPool,
    multi_edges: &BTreeSet<Pair>,
    net: &mut N,
    rng: &mut RngHandle,
    n0: NodeId,
    si: usize,
) -> Result<bool, PlexError> {
    let (e1, e2) = sample_slot_pair(rng, pool.slot_count());
    let (a1, b1) = pool.slot(e1);
    let (a2, b2) = pool.slot(e2);
    if !all_distinct(&[n0, a1, b1, a2, b2]) {
        return Ok(false);
    }
    let (n2, n3) = ordered_pair(a1, b1);
    let (n4, n5) = ordered_pair(a2, b2);
    if multi_edges.contains(&(n2, n3)) || multi_edges.contains(&(n4, n5)) {
        return Ok(false);
    }
    if net.has_edge(n0, n2) || net.has_edge(n0, n4) || net.has_edge(n3, n5) {
        return Ok(false);
    }

    net.remove_edge(n2, n3)?;
    net.remove_edge(n4, n5)?;
    net.set_edge_weight(n0, n2, 1.0)?;
    net.set_edge_weight(n0, n4, 1.0)?;
    net.set_edge_weight(n3, n5, 1.0)?;
    pool.write_slot(si, n3, n5);
    pool.write_slot(e1, n0, n2);
    pool.write_slot(e2, n0, n4);
    Ok(true)
}

/// Resolves every duplicate pairing with a four-edge rewire. Returns the number of rewires.
///
/// Each rewire consumes two pairings of the duplicated pair `n1-n2` together with sampled
/// slots `(n3, n4)` and `(n5, n6)`, and adds `n1-n3`, `n2-n4`, `n1-n5` and `n2-n6`. The
/// committed `n1-n2` edge is removed once no pairing of it is left.
pub(crate) fn eliminate_multi_edges<N: Network + ?Sized>(
    pool: &mut StubPool,
    pairing: &mut Pairing,
    net: &mut N,
    budget: &mut AttemptBudget,
    rng: &mut RngHandle,
) -> Result<usize, RewireFailure> {
    if pairing.multi_edges.is_empty() {
        return Ok(0);
    }
    ensure_feasible(pool, Phase::MultiEdge, MULTI_EDGE_REWIRE_NODES, 4)?;

    let multi_edges = &pairing.multi_edges;
    let edge_index = &mut pairing.edge_index;
    let mut rewires = 0;
    for &pair in multi_edges {
        let rounds = edge_index.get(&pair).map_or(0, |positions| positions.len() / 2);
        for _ in 0..rounds {
            let attempts = budget.retry(Phase::MultiEdge, || {
                try_multi_edge_rewire(pool, multi_edges, edge_index, net, rng, pair)
            })?;
            rewires += 1;
            log::trace!(
                "absorbed duplicate {}-{} after {} attempts",
                pair.0.as_raw(),
                pair.1.as_raw(),
                attempts
            );
        }
    }
    Ok(rewires)
}

fn try_multi_edge_rewire<N: Network + ?Sized>(
    pool: &mut StubPool,
    multi_edges: &BTreeSet<Pair>,
    edge_index: &mut BTreeMap<Pair, Vec<usize>>,
    net: &mut N,
    rng: &mut RngHandle,
    (n1, n2): Pair,
) -> Result<bool, PlexError> {
    let (e1, e2) = sample_slot_pair(rng, pool.slot_count());
    let (a1, b1) = pool.slot(e1);
    let (a2, b2) = pool.slot(e2);
    if !all_distinct(&[n1, n2, a1, b1, a2, b2]) {
        return Ok(false);
    }
    let (n3, n4) = ordered_pair(a1, b1);
    let (n5, n6) = ordered_pair(a2, b2);
    if multi_edges.contains(&(n3, n4)) || multi_edges.contains(&(n5, n6)) {
        return Ok(false);
    }
    if net.has_edge(n1, n3) || net.has_edge(n2, n4) || net.has_edge(n1, n5) || net.has_edge(n2, n6)
    {
        return Ok(false);
    }

    let positions = edge_index
        .get_mut(&(n1, n2))
        .filter(|positions| positions.len() >= 2)
        .ok_or_else(|| {
            PlexError::Network(
                ErrorInfo::new("missing-pairing", "duplicate pair has no pairings left")
                    .with_context("a", n1.as_raw())
                    .with_context("b", n2.as_raw()),
            )
        })?;
    let consumed = positions.split_off(positions.len() - 2);
    let (p1, p2) = (consumed[1], consumed[0]);
    if positions.is_empty() {
        net.remove_edge(n1, n2)?;
    }

    net.remove_edge(n3, n4)?;
    net.remove_edge(n5, n6)?;
    net.set_edge_weight(n1, n3, 1.0)?;
    net.set_edge_weight(n2, n4, 1.0)?;
    net.set_edge_weight(n1, n5, 1.0)?;
    net.set_edge_weight(n2, n6, 1.0)?;
    pool.write_slot(p1, n1, n3);
    pool.write_slot(p2, n2, n4);
    pool.write_slot(e1, n1, n5);
    pool.write_slot(e2, n2, n6);
    Ok(true)
}

/// Draws two distinct slots uniformly and returns their starting positions.
fn sample_slot_pair(rng: &mut RngHandle, slots: usize) -> (usize, usize) {
    let picked = index::sample(rng, slots, 2);
    (2 * picked.index(0), 2 * picked.index(1))
}

/// A rewire needs `nodes` distinct stub owners and at least `slots` slots to ever succeed.
fn ensure_feasible(
    pool: &StubPool,
    phase: Phase,
    nodes: usize,
    slots: usize,
) -> Result<(), RewireFailure> {
    if pool.connected_nodes() < nodes || pool.slot_count() < slots {
        return Err(RewireFailure::Stalled {
            phase,
            reason: StallReason::Infeasible,
            attempts: 0,
        });
    }
    Ok(())
}
