use geo::{Distance, Euclidean, Point};

use crate::model::{ShortcutMap, Trajectory};
use crate::simplify::etd::{equal_time_distance, Window};
use crate::simplify::search::double_and_search;

/// Agarwal simplification with double-and-search.
///
/// Starting from the first vertex, repeatedly appends the farthest vertex
/// whose spanned sub-polyline stays within `epsilon` of the appended
/// segment under the equal-time-distance bound. The scratch buffers are
/// reused across calls so a worker can simplify a whole batch without
/// reallocating.
#[derive(Debug, Default)]
pub struct AgarwalSimplifier {
    search: SearchParams,
    simp_points: Vec<Point>,
    simp_distances: Vec<f64>,
    simp_totals: Vec<f64>,
}

/// Probe-growth parameters of the double-and-search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchParams {
    pub base: f64,
    pub exponent_step: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            base: 2.0,
            exponent_step: 1.0,
        }
    }
}

impl AgarwalSimplifier {
    pub fn new(base: f64, exponent_step: f64) -> Self {
        AgarwalSimplifier {
            search: SearchParams {
                base,
                exponent_step,
            },
            ..AgarwalSimplifier::default()
        }
    }

    /// Simplifies `t` subject to `epsilon`.
    pub fn simplify(&mut self, t: &Trajectory, epsilon: f64) -> Trajectory {
        self.simp_points.clear();
        self.simp_distances.clear();
        self.simp_totals.clear();

        self.simp_points.push(t.points[0]);
        self.simp_distances.push(0.0);
        self.simp_totals.push(0.0);
        let mut source_index = vec![t.source_index[0]];

        let mut simp_size = 1;
        let mut range_start = 1;
        let mut prevk = 0;
        loop {
            let k = self.find_last_match(t, simp_size, range_start, t.len(), prevk, epsilon);

            // re-apply the chosen vertex: the search may have probed past
            // it last, and rejected probes must not leak into the output
            let chosen = t.points[k];
            let dist = Euclidean.distance(chosen, self.simp_points[simp_size - 1]);
            self.simp_points[simp_size] = chosen;
            self.simp_distances[simp_size] = dist;
            self.simp_totals[simp_size] = self.simp_totals[simp_size - 1] + dist;
            source_index.push(t.source_index[k]);
            simp_size += 1;

            if k == t.len() - 1 {
                break;
            }
            prevk = k;
            range_start = k + 1;
        }

        Trajectory {
            name: format!("{}[simplified]", t.name),
            points: self.simp_points.clone(),
            distances: self.simp_distances.clone(),
            totals: self.simp_totals.clone(),
            source_index,
            bounds: self.simp_points.iter().copied().collect(),
            epsilon: Some(epsilon),
            portals: Vec::new(),
            simplifications: Vec::new(),
            shortcuts: ShortcutMap::default(),
        }
    }

    /// Finds the index of the last vertex of `t` that still satisfies
    /// `epsilon` when appended after the current simplification prefix.
    fn find_last_match(
        &mut self,
        t: &Trajectory,
        simp_size: usize,
        start: usize,
        end: usize,
        prevk: usize,
        epsilon: f64,
    ) -> usize {
        // grow the scratch by one tentative slot the probes write into
        self.simp_points.push(t.points[0]);
        self.simp_distances.push(0.0);
        self.simp_totals.push(0.0);

        let search = self.search;
        let simp_points = &mut self.simp_points;
        let simp_distances = &mut self.simp_distances;
        let simp_totals = &mut self.simp_totals;

        double_and_search(
            |index| {
                let candidate = t.points[index];
                let dist = Euclidean.distance(candidate, simp_points[simp_size - 1]);
                simp_points[simp_size] = candidate;
                simp_distances[simp_size] = dist;
                simp_totals[simp_size] = simp_totals[simp_size - 1] + dist;

                // upper bound on the sub-trajectory Fréchet distance
                let bound = equal_time_distance(
                    Window {
                        points: &t.points,
                        totals: &t.totals,
                        distances: &t.distances,
                        start: prevk,
                        end: index + 1,
                    },
                    Window {
                        points: simp_points.as_slice(),
                        totals: simp_totals.as_slice(),
                        distances: simp_distances.as_slice(),
                        start: simp_size - 1,
                        end: simp_size + 1,
                    },
                );
                bound <= epsilon
            },
            start,
            end,
            search.base,
            search.exponent_step,
        )
    }
}
