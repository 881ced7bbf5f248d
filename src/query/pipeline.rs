//! Pruning stages run per (query, candidate) pair.
//!
//! Each stage is cheap relative to the one after it and emits a
//! [`Decision`]; a candidate only ever reaches the full decision Fréchet
//! computation when every earlier stage answered `Maybe`.

use crate::frechet::CdfShortcuts;
use crate::model::Trajectory;
use crate::simplify::equal_time;

/// Verdict of one pruning stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    Maybe,
}

/// How many candidates of one query reached each pipeline stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Candidates emitted by the spatial hash.
    pub candidates: usize,
    /// Candidates the simplification ladder could not decide.
    pub past_ladder: usize,
    /// Candidates the equal-time bound could not decide either.
    pub past_equal_time: usize,
    /// Final matches.
    pub matches: usize,
}

impl QueryStats {
    pub fn merge(&mut self, other: &QueryStats) {
        self.candidates += other.candidates;
        self.past_ladder += other.past_ladder;
        self.past_equal_time += other.past_equal_time;
        self.matches += other.matches;
    }
}

/// Compares the two simplification ladders level by level.
///
/// With `eps_q`, `eps_t` the epsilons the level-i simplifications were
/// built with, the triangle inequality bounds the true distance:
///
/// ```text
/// d_F(Q_i, T_i) - eps_q - eps_t <= d_F(Q, T) <= d_F(Q_i, T_i) + eps_q + eps_t
/// ```
///
/// so a decision on the simplified pair at the tightened or widened
/// threshold transfers to the originals. The freespace tests inside the
/// solver run at the adjusted threshold while portal costs are still
/// judged against the original `delta`.
pub fn prune_with_simplifications(
    cdf: &mut CdfShortcuts,
    q: &Trajectory,
    t: &Trajectory,
    delta: f64,
) -> Decision {
    for (qs, ts) in q.simplifications.iter().zip(t.simplifications.iter()) {
        let eps_q = qs.epsilon.unwrap_or(0.0);
        let eps_t = ts.epsilon.unwrap_or(0.0);
        let delta_low = delta - eps_q - eps_t;
        let delta_high = delta + eps_q + eps_t;

        // greedy check on the upper bound
        if equal_time(ts, qs) < delta_low {
            return Decision::Yes;
        }
        if delta_low > 0.0 && cdf.decide(qs, ts, delta_low, delta) {
            return Decision::Yes;
        }
        if delta_high > 0.0 && !cdf.decide(qs, ts, delta_high, delta) {
            return Decision::No;
        }
    }
    Decision::Maybe
}

/// Equal time distance is an upper bound on the Fréchet distance, so a
/// pass at `delta` is conclusive; a failure is not.
pub fn prune_with_equal_time(q: &Trajectory, t: &Trajectory, delta: f64) -> Decision {
    if equal_time(t, q) < delta {
        Decision::Yes
    } else {
        Decision::Maybe
    }
}

/// Runs the full pipeline for one candidate, updating the stage counters.
pub fn resolve(
    cdf: &mut CdfShortcuts,
    q: &Trajectory,
    t: &Trajectory,
    delta: f64,
    stats: &mut QueryStats,
) -> bool {
    stats.candidates += 1;

    match prune_with_simplifications(cdf, q, t, delta) {
        Decision::Yes => {
            stats.matches += 1;
            return true;
        }
        Decision::No => return false,
        Decision::Maybe => {}
    }
    stats.past_ladder += 1;

    if prune_with_equal_time(q, t, delta) == Decision::Yes {
        stats.matches += 1;
        return true;
    }
    stats.past_equal_time += 1;

    // the last stage is conclusive
    let matched = cdf.decide(q, t, delta, delta);
    if matched {
        stats.matches += 1;
    }
    matched
}
