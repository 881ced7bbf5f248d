//! Equal time distance between two polylines.
//!
//! The ETD algorithm approximates the Fréchet distance from above by
//! taking the 'dog leash' length when traversing two polylines at the
//! same relative speed. Used as the feasibility oracle of the Agarwal
//! simplifiers and as a greedy YES check in the query pipeline.

use geo::Point;

use crate::geom::{dist_sq, lerp};
use crate::model::Trajectory;

/// A window view into a polyline's vertex and arc-length arrays.
///
/// `start` is the first vertex of the window and `end` is exclusive, both
/// measured on the underlying arrays, so a window can address a
/// sub-polyline without copying.
#[derive(Clone, Copy)]
pub struct Window<'a> {
    pub points: &'a [Point],
    pub totals: &'a [f64],
    pub distances: &'a [f64],
    pub start: usize,
    pub end: usize,
}

impl<'a> Window<'a> {
    /// The whole trajectory as a window.
    pub fn full(t: &'a Trajectory) -> Self {
        Window {
            points: &t.points,
            totals: &t.totals,
            distances: &t.distances,
            start: 0,
            end: t.len(),
        }
    }
}

/// Equal time distance over the two trajectories in full.
pub fn equal_time(p: &Trajectory, q: &Trajectory) -> f64 {
    equal_time_distance(Window::full(p), Window::full(q))
}

/// Walks a common arc-length fraction from 0 to 1 over both windows,
/// advancing whichever cursor hits its next vertex first and
/// interpolating the other linearly, and returns the maximum distance
/// seen (the endpoint pairs included).
///
/// A window of zero arc length degenerates to the larger of the two
/// endpoint-pair distances.
pub fn equal_time_distance(p: Window, q: Window) -> f64 {
    let p_offset = p.totals[p.start];
    let q_offset = q.totals[q.start];
    let p_length = p.totals[p.end - 1] - p_offset;
    let q_length = q.totals[q.end - 1] - q_offset;
    let p_scale = q_length / p_length;

    let mut p_ptr = p.start + 1;
    let mut q_ptr = q.start + 1;

    let mut max_sq = dist_sq(p.points[p.start], q.points[q.start]);
    let end_sq = dist_sq(p.points[p.end - 1], q.points[q.end - 1]);
    if p_length == 0.0 || q_length == 0.0 {
        return max_sq.max(end_sq).sqrt();
    }

    // common arc-length fraction, 0 to 1
    let mut position = 0.0;

    while !(p_ptr == p.end - 1 && q_ptr == q.end - 1) {
        // which vertex event fires next on the diagonal
        let mut next_p = p.totals[p_ptr] - p_offset - position * p_length;
        let mut next_q = q.totals[q_ptr] - q_offset - position * q_length;

        // a cursor at its final vertex no longer produces events
        if p_ptr == p.end - 1 {
            next_p = f64::MAX;
        }
        if q_ptr == q.end - 1 {
            next_q = f64::MAX;
        }

        let p_pt;
        let q_pt;
        if next_p * p_scale < next_q {
            p_pt = p.points[p_ptr];
            position = (p.totals[p_ptr] - p_offset) / p_length;
            let scale = (position * q_length - (q.totals[q_ptr - 1] - q_offset)) / q.distances[q_ptr];
            q_pt = lerp(q.points[q_ptr - 1], q.points[q_ptr], scale);
            p_ptr += 1;
        } else {
            q_pt = q.points[q_ptr];
            position = (q.totals[q_ptr] - q_offset) / q_length;
            let scale = (position * p_length - (p.totals[p_ptr - 1] - p_offset)) / p.distances[p_ptr];
            p_pt = lerp(p.points[p_ptr - 1], p.points[p_ptr], scale);
            q_ptr += 1;
        }

        let d = dist_sq(p_pt, q_pt);
        if d > max_sq {
            max_sq = d;
        }
    }

    let d = dist_sq(p.points[p_ptr], q.points[q_ptr]);
    if d > max_sq {
        max_sq = d;
    }
    max_sq.sqrt()
}
