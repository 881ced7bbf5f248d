use geo::Point;

use crate::geom::Bounds;
use crate::model::{Portal, ShortcutMap};

/// A polyline with per-vertex cumulative arc length.
///
/// Originals and simplifications share this one record: a simplification
/// is a `Trajectory` whose `epsilon` is set and whose `source_index` maps
/// each vertex back to the trajectory it was simplified from. The record
/// owns its simplification ladder; the source of a simplification is
/// passed by reference into the operations that need it rather than being
/// stored, so there is no ownership cycle.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub name: String,

    pub points: Vec<Point>,
    /// `distances[i]` is `|points[i] - points[i - 1]|`, `distances[0]` is 0.
    pub distances: Vec<f64>,
    /// Arc length from the start up to each vertex.
    pub totals: Vec<f64>,
    /// Index of each vertex in the underlying original. Identity for
    /// originals, strictly increasing always.
    pub source_index: Vec<usize>,

    pub bounds: Bounds,

    /// The epsilon this simplification was built with; `None` on
    /// originals.
    pub epsilon: Option<f64>,
    /// Portals recorded while building this simplification. Indices are
    /// vertex indices on the parent.
    pub portals: Vec<Portal>,

    /// Simplification ladder, increasing fidelity.
    pub simplifications: Vec<Trajectory>,
    /// Freespace jumps aggregated from the ladder, keyed by source vertex.
    pub shortcuts: ShortcutMap,
}

impl Trajectory {
    /// Builds a trajectory from raw vertices, dropping consecutive exact
    /// duplicates and computing the arc-length tables.
    ///
    /// Returns `None` when fewer than two distinct vertices remain; such
    /// degenerate trajectories are skipped by the callers.
    pub fn from_points<I>(name: impl Into<String>, raw: I) -> Option<Trajectory>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points: Vec<Point> = Vec::new();
        let mut distances = vec![0.0];
        let mut totals = vec![0.0];
        let mut bounds = Bounds::default();

        for point in raw {
            bounds.extend(point);
            match points.last() {
                None => points.push(point),
                // ignore duplicate verts, they are annoying
                Some(prev) if *prev == point => {}
                Some(prev) => {
                    let dist = crate::geom::dist_sq(*prev, point).sqrt();
                    distances.push(dist);
                    totals.push(totals[totals.len() - 1] + dist);
                    points.push(point);
                }
            }
        }

        if points.len() < 2 {
            return None;
        }

        let source_index = (0..points.len()).collect();
        Some(Trajectory {
            name: name.into(),
            points,
            distances,
            totals,
            source_index,
            bounds,
            ..Trajectory::default()
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First vertex.
    #[inline]
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Last vertex.
    #[inline]
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Total arc length.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.totals[self.totals.len() - 1]
    }

    /// Diagonal of the bounding box.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.bounds.diagonal()
    }
}
