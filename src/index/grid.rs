use geo::Point;
use itertools::iproduct;
use rustc_hash::FxHashMap;

use crate::geom::{dist_sq, Bounds};
use crate::model::Trajectory;

/// A trajectory endpoint stored in the hash.
#[derive(Clone, Copy, Debug)]
pub struct EndPoint {
    pub position: Point,
    /// Index of the trajectory in the dataset.
    pub trajectory: usize,
    /// Whether this is the first vertex of the trajectory.
    pub is_start: bool,
}

/// A uniform grid over the dataset bounding box, used as a coarse range
/// filter: a query only ever needs the trajectories whose start AND end
/// both lie within delta of its own.
///
/// Cells are stored sparsely; most of the grid is empty for real
/// datasets.
#[derive(Debug)]
pub struct SpatialHash {
    bounds: Bounds,
    slots: usize,
    /// Tolerance absorbing representation errors at the grid boundary.
    tolerance: f64,
    cells: FxHashMap<(usize, usize), Vec<EndPoint>>,
}

impl SpatialHash {
    pub fn new(bounds: Bounds, slots: usize, tolerance: f64) -> Self {
        SpatialHash {
            bounds,
            slots,
            tolerance,
            cells: FxHashMap::default(),
        }
    }

    /// Slot of `value` on the axis `(min, max)`.
    ///
    /// Values within tolerance of the boundary snap to the first or last
    /// slot. Out-of-range values are clamped when `overflow` is allowed
    /// (range lookups); inserts are expected to stay inside the bounds.
    fn slot(&self, value: f64, min: f64, max: f64, overflow: bool) -> usize {
        if (min - value).abs() < self.tolerance {
            return 0;
        }
        if (max - value).abs() < self.tolerance {
            return self.slots - 1;
        }
        let step = (max - min).abs() / self.slots as f64;
        let raw = (value - min) / step;
        if raw < 0.0 {
            debug_assert!(overflow, "insert below the hash bounds");
            return 0;
        }
        let slot = raw as usize;
        if slot >= self.slots {
            debug_assert!(overflow, "insert above the hash bounds");
            return self.slots - 1;
        }
        slot
    }

    fn cell(&self, position: Point, overflow: bool) -> (usize, usize) {
        (
            self.slot(position.x(), self.bounds.min.x, self.bounds.max.x, overflow),
            self.slot(position.y(), self.bounds.min.y, self.bounds.max.y, overflow),
        )
    }

    pub fn insert(&mut self, point: EndPoint) {
        let cell = self.cell(point.position, false);
        self.cells.entry(cell).or_default().push(point);
    }

    /// Inserts the start and end vertices of a dataset trajectory.
    pub fn insert_trajectory(&mut self, index: usize, t: &Trajectory) {
        self.insert(EndPoint {
            position: t.start(),
            trajectory: index,
            is_start: true,
        });
        self.insert(EndPoint {
            position: t.end(),
            trajectory: index,
            is_start: false,
        });
    }

    /// Emits every trajectory whose start lies strictly within `eps` of
    /// `start` and whose end lies strictly within `eps` of `end`.
    ///
    /// The walk covers every cell the `eps`-box around `start` overlaps,
    /// filters the start entries by actual distance, and checks the
    /// matching trajectory's end vertex directly; the emitted set is a
    /// superset filter, never missing a true match.
    pub fn range_query<F>(
        &self,
        start: Point,
        end: Point,
        eps: f64,
        trajectories: &[Option<Trajectory>],
        mut emit: F,
    ) where
        F: FnMut(usize),
    {
        let x0 = self.slot(start.x() - eps, self.bounds.min.x, self.bounds.max.x, true);
        let x1 = self.slot(start.x() + eps, self.bounds.min.x, self.bounds.max.x, true);
        let y0 = self.slot(start.y() - eps, self.bounds.min.y, self.bounds.max.y, true);
        let y1 = self.slot(start.y() + eps, self.bounds.min.y, self.bounds.max.y, true);

        let eps_sq = eps * eps;
        for cell in iproduct!(x0..=x1, y0..=y1) {
            let Some(points) = self.cells.get(&cell) else {
                continue;
            };
            for point in points {
                if !point.is_start || dist_sq(point.position, start) >= eps_sq {
                    continue;
                }
                let Some(t) = trajectories.get(point.trajectory).and_then(Option::as_ref) else {
                    continue;
                };
                if dist_sq(t.end(), end) < eps_sq {
                    emit(point.trajectory);
                }
            }
        }
    }

    /// Number of stored endpoints.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
