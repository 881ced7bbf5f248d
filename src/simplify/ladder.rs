//! Simplification-ladder construction and the learned-epsilon table.

use log::trace;

use crate::model::{portal, Trajectory};
use crate::settings::{Settings, NUM_LEVELS};
use crate::simplify::agarwal::AgarwalSimplifier;
use crate::simplify::progressive::ProgressiveSimplifier;
use crate::simplify::search::{binary_search_real, Refine};

/// Accumulated epsilon / diagonal ratios per ladder level.
///
/// Every dataset trajectory contributes the epsilon its binary search
/// settled on; query trajectories skip the search and reuse the averaged
/// ratios. Workers accumulate privately and merge at phase join.
#[derive(Clone, Debug, Default)]
pub struct EpsilonStats {
    sums: [f64; NUM_LEVELS],
    count: usize,
}

impl EpsilonStats {
    pub fn record(&mut self, level: usize, ratio: f64) {
        self.sums[level] += ratio;
    }

    /// Counts one fully simplified trajectory.
    pub fn bump(&mut self) {
        self.count += 1;
    }

    pub fn merge(&mut self, other: &EpsilonStats) {
        for (sum, o) in self.sums.iter_mut().zip(other.sums.iter()) {
            *sum += o;
        }
        self.count += other.count;
    }

    /// Average epsilon / diagonal ratio learned for `level`, or 0 when
    /// nothing has been learned (the ladder then degenerates to
    /// full-fidelity copies, which is correct but unpruned).
    pub fn ratio(&self, level: usize) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sums[level] / self.count as f64
    }

    pub fn samples(&self) -> usize {
        self.count
    }
}

/// Builds the simplification ladder of a dataset trajectory.
///
/// Each level binary-searches an epsilon in `(diagonal / 100000,
/// diagonal / 2]` such that the simplification lands just above the
/// level's target vertex count, keeping whatever the last probe produced
/// once the budget runs out. The upper bound is narrowed to the last
/// probed epsilon so the finer levels search a smaller window.
pub fn simplify_trajectory(
    t: &mut Trajectory,
    agarwal: &mut AgarwalSimplifier,
    stats: &mut EpsilonStats,
    settings: &Settings,
) {
    let diagonal = t.diagonal();
    let n = t.len();

    let mut targets = [0usize; NUM_LEVELS];
    for (target, ratio) in targets.iter_mut().zip(settings.level_ratios.iter()) {
        *target = ((ratio * n as f64).ceil() as usize).max(settings.min_simplification_size);
    }
    // start simple in case the spatial hash prunes nothing
    targets[0] = targets[0].min(settings.level0_max_size);

    let lower = diagonal / 100_000.0;
    let mut upper = diagonal / 2.0;

    for level in 0..NUM_LEVELS {
        let mut probes = 0;
        let mut last_epsilon = 0.0;
        let mut simp = None;
        binary_search_real(
            |epsilon| {
                last_epsilon = epsilon;
                let candidate = agarwal.simplify(t, epsilon);
                probes += 1;
                let verdict = if probes == settings.epsilon_search_budget {
                    Refine::Stop
                } else if candidate.len() > targets[level] {
                    Refine::Up
                } else {
                    Refine::Down
                };
                simp = Some(candidate);
                verdict
            },
            upper,
            lower,
        );

        upper = last_epsilon;
        stats.record(level, last_epsilon / diagonal);
        if let Some(simp) = simp {
            trace!(
                "{}: level {level} settled on eps {last_epsilon:.6} ({} of {} vertices)",
                t.name,
                simp.len(),
                n
            );
            t.simplifications.push(simp);
        }
    }
    stats.bump();

    attach_shortcuts(t);
}

/// Builds the simplification ladder of a query trajectory from the
/// learned ratios, plus the nested ladders whose only purpose is to
/// harvest freespace jumps for the per-level pruning runs.
pub fn simplify_query_trajectory(
    q: &mut Trajectory,
    progressive: &mut ProgressiveSimplifier,
    stats: &EpsilonStats,
) {
    let diagonal = q.diagonal();

    let own = progressive_ladder(q, q, NUM_LEVELS, diagonal, progressive, stats);
    q.simplifications = own;
    attach_shortcuts(q);

    // the simplifications are themselves simplified; not because those
    // levels are used directly, but for their freespace jumps
    for level in 1..NUM_LEVELS {
        let nested = progressive_ladder(
            &q.simplifications[level],
            q,
            level - 1,
            diagonal,
            progressive,
            stats,
        );
        let parent = &mut q.simplifications[level];
        parent.simplifications = nested;
        attach_shortcuts(parent);
    }
}

fn progressive_ladder(
    parent: &Trajectory,
    source: &Trajectory,
    levels: usize,
    diagonal: f64,
    progressive: &mut ProgressiveSimplifier,
    stats: &EpsilonStats,
) -> Vec<Trajectory> {
    (0..levels)
        .map(|level| progressive.simplify(parent, source, diagonal * stats.ratio(level)))
        .collect()
}

/// Compiles the portals of every ladder entry into the owner's shortcut
/// map.
fn attach_shortcuts(t: &mut Trajectory) {
    let Trajectory {
        simplifications,
        shortcuts,
        ..
    } = t;
    for simp in simplifications.iter() {
        portal::merge_portals(shortcuts, &simp.portals);
    }
    portal::sort_buckets(shortcuts);
}
