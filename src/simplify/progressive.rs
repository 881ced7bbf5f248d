use geo::{Distance, Euclidean, Point};

use crate::model::{Portal, ShortcutMap, Trajectory};
use crate::simplify::agarwal::SearchParams;
use crate::simplify::etd::{equal_time_distance, Window};
use crate::simplify::search::double_and_search;

/// Agarwal simplification of an already-simplified parent, measured
/// against the underlying source trajectory.
///
/// The feasibility oracle maps candidate windows through the parent's
/// source-index table and evaluates equal time distance on the source, so
/// the bound accounts for everything the earlier simplification already
/// flattened. Every probe is recorded as a [`Portal`] carrying that exact
/// shortcut cost, which is what the freespace solver later jumps through.
#[derive(Debug, Default)]
pub struct ProgressiveSimplifier {
    search: SearchParams,
    simp_points: Vec<Point>,
    simp_distances: Vec<f64>,
    simp_totals: Vec<f64>,
    source_index: Vec<usize>,
}

impl ProgressiveSimplifier {
    pub fn new(base: f64, exponent_step: f64) -> Self {
        ProgressiveSimplifier {
            search: SearchParams {
                base,
                exponent_step,
            },
            ..ProgressiveSimplifier::default()
        }
    }

    /// Simplifies `parent` subject to `epsilon`, bounding against
    /// `source`.
    pub fn simplify(&mut self, parent: &Trajectory, source: &Trajectory, epsilon: f64) -> Trajectory {
        self.simp_points.clear();
        self.simp_distances.clear();
        self.simp_totals.clear();
        self.source_index.clear();

        self.simp_points.push(parent.points[0]);
        self.simp_distances.push(0.0);
        self.simp_totals.push(0.0);
        self.source_index.push(parent.source_index[0]);

        let mut portals = Vec::new();
        let mut simp_size = 1;
        let mut range_start = 1;
        let mut prevk = 0;
        loop {
            let k = self.find_last_match(
                parent,
                source,
                simp_size,
                range_start,
                prevk,
                epsilon,
                &mut portals,
            );

            let chosen = parent.points[k];
            let dist = Euclidean.distance(chosen, self.simp_points[simp_size - 1]);
            self.simp_points[simp_size] = chosen;
            self.simp_distances[simp_size] = dist;
            self.simp_totals[simp_size] = self.simp_totals[simp_size - 1] + dist;
            self.source_index.push(parent.source_index[k]);
            simp_size += 1;

            if k == parent.len() - 1 {
                break;
            }
            prevk = k;
            range_start = k + 1;
        }

        Trajectory {
            name: format!("{}[simplified]", parent.name),
            points: self.simp_points.clone(),
            distances: self.simp_distances.clone(),
            totals: self.simp_totals.clone(),
            source_index: self.source_index.clone(),
            bounds: self.simp_points.iter().copied().collect(),
            epsilon: Some(epsilon),
            portals,
            simplifications: Vec::new(),
            shortcuts: ShortcutMap::default(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn find_last_match(
        &mut self,
        parent: &Trajectory,
        source: &Trajectory,
        simp_size: usize,
        start: usize,
        prevk: usize,
        epsilon: f64,
        portals: &mut Vec<Portal>,
    ) -> usize {
        self.simp_points.push(parent.points[0]);
        self.simp_distances.push(0.0);
        self.simp_totals.push(0.0);

        let search = self.search;
        let simp_points = &mut self.simp_points;
        let simp_distances = &mut self.simp_distances;
        let simp_totals = &mut self.simp_totals;

        double_and_search(
            |index| {
                let candidate = parent.points[index];
                let dist = Euclidean.distance(candidate, simp_points[simp_size - 1]);
                simp_points[simp_size] = candidate;
                simp_distances[simp_size] = dist;
                simp_totals[simp_size] = simp_totals[simp_size - 1] + dist;

                // the candidate window, mapped onto the source trajectory
                let window_start = parent.source_index[prevk];
                let window_end = if index + 1 >= parent.source_index.len() {
                    source.len()
                } else {
                    parent.source_index[index + 1]
                };

                let bound = equal_time_distance(
                    Window {
                        points: &source.points,
                        totals: &source.totals,
                        distances: &source.distances,
                        start: window_start,
                        end: window_end,
                    },
                    Window {
                        points: simp_points.as_slice(),
                        totals: simp_totals.as_slice(),
                        distances: simp_distances.as_slice(),
                        start: simp_size - 1,
                        end: simp_size + 1,
                    },
                );

                // record the freespace jump this probe just costed
                portals.push(Portal {
                    source: prevk,
                    destination: index,
                    distance: bound,
                });
                bound <= epsilon
            },
            start,
            parent.len(),
            search.base,
            search.exponent_step,
        )
    }
}
