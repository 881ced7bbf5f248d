use geo::{Distance, Euclidean, Point};

use crate::geom::{dist_sq, edge_interval};
use crate::model::{ShortcutMap, Trajectory};

/// A contiguous run of rows whose right edges are reachable.
///
/// `lowest_right` is the lowest reachable coordinate on the right edge of
/// `start_row`; everything above inside the span is fully reachable.
#[derive(Clone, Copy, Debug, Default)]
struct SpanEntry {
    start_row: usize,
    end_row: usize,
    lowest_right: f64,
}

/// Decision Fréchet solver that leaps over reachable intervals through
/// simplification portals.
///
/// The freespace tests run against `delta`, which the pipeline may have
/// tightened by the triangle inequality; portal costs are always judged
/// against the original query delta (`base_delta`) so the slack
/// introduced by simplification stays accounted for.
#[derive(Debug, Default)]
pub struct CdfShortcuts {
    current: Vec<SpanEntry>,
    next: Vec<SpanEntry>,
    rows_visited: usize,
    jumps: usize,
}

/// Fréchet distance between the segment `p_start -> p_end` and the single
/// vertex `q`.
#[inline]
fn segment_frechet(p_start: Point, p_end: Point, q: Point) -> f64 {
    dist_sq(p_start, q).max(dist_sq(p_end, q)).sqrt()
}

/// Appends a single-row span, or extends the previous span when the right
/// edge is completely free and adjacent.
#[inline]
fn push_span(next: &mut Vec<SpanEntry>, row: usize, lowest_right: f64, complete: bool) {
    match next.last_mut() {
        Some(last) if complete && lowest_right == 0.0 && last.end_row + 1 == row => {
            last.end_row = row;
        }
        _ => next.push(SpanEntry {
            start_row: row,
            end_row: row,
            lowest_right,
        }),
    }
}

impl CdfShortcuts {
    /// Decides `d_F(p, q) <= delta`, jumping through `p`'s shortcut map.
    pub fn decide(&mut self, p: &Trajectory, q: &Trajectory, delta: f64, base_delta: f64) -> bool {
        self.decide_with(&p.points, &q.points, delta, base_delta, &p.shortcuts)
    }

    /// Decides on raw vertex arrays. Rows of the diagram correspond to
    /// segments of `p`, columns to segments of `q`; the portals must be
    /// keyed by `p` vertex indices.
    pub fn decide_with(
        &mut self,
        p: &[Point],
        q: &[Point],
        delta: f64,
        base_delta: f64,
        shortcuts: &ShortcutMap,
    ) -> bool {
        if p.len() < 2 || q.len() < 2 {
            return false;
        }
        if Euclidean.distance(p[0], q[0]) > delta
            || Euclidean.distance(p[p.len() - 1], q[q.len() - 1]) > delta
        {
            return false;
        }

        // the bottom-left cell is free space by the check above
        self.current.clear();
        self.current.push(SpanEntry::default());

        for column in 0..q.len() - 1 {
            if self.current.is_empty() {
                // nothing reachable anymore
                return false;
            }
            self.next.clear();

            let mut row = self.current[0].start_row;
            let mut qi = 0;
            // while there's reachable cells left in the queue
            while qi < self.current.len() {
                let mut left_most_top = 2.0;
                loop {
                    let outside = qi >= self.current.len();

                    let right = edge_interval(q[column + 1], p[row], p[row + 1], delta);
                    if let Some(right) = &right {
                        if left_most_top <= 1.0 {
                            // entered through the top of the previous cell
                            push_span(&mut self.next, row, right.start, right.is_complete());
                        } else if !outside {
                            let head = self.current[qi];
                            let inside = row >= head.start_row && row <= head.end_row;
                            let blocked = row == head.start_row && head.lowest_right > right.end;
                            if inside && !blocked {
                                // entered through the left edge
                                let prev_right = if row == head.start_row {
                                    head.lowest_right
                                } else {
                                    0.0
                                };
                                push_span(
                                    &mut self.next,
                                    row,
                                    prev_right.max(right.start),
                                    right.is_complete(),
                                );
                            }
                        }
                    }

                    let top = edge_interval(p[row + 1], q[column], q[column + 1], delta);
                    let consuming = !outside && {
                        let head = self.current[qi];
                        row >= head.start_row && row <= head.end_row
                    };
                    if consuming {
                        if row == self.current[qi].end_row {
                            // consume the queue entry of this span
                            qi += 1;
                        }
                        left_most_top = top.map_or(2.0, |t| t.start);
                    } else if let Some(top) = &top {
                        if left_most_top <= top.end {
                            left_most_top = left_most_top.max(top.start);
                        } else {
                            left_most_top = 2.0;
                        }
                    } else {
                        left_most_top = 2.0;
                    }

                    // try and jump
                    let jump_off = right.is_some_and(|r| r.end == 1.0)
                        && self.next.last().is_some_and(|e| e.end_row == row);
                    if jump_off {
                        if let Some(head) = self.current.get(qi).copied() {
                            if head.end_row - head.start_row > 1 {
                                if let Some(portal) =
                                    self.choose_portal(p, q[column], &head, row, base_delta, shortcuts)
                                {
                                    // JUMP! the -1 counters the increment below
                                    row = portal.destination - 1;
                                    if let Some(last) = self.next.last_mut() {
                                        last.end_row = row;
                                    }
                                    self.jumps += 1;
                                }
                            }
                        }
                    }

                    // propagated reachability by one cell, look at the next row
                    row += 1;
                    self.rows_visited += 1;
                    if !(left_most_top <= 1.0 && row < p.len() - 1) {
                        break;
                    }
                }
            }

            std::mem::swap(&mut self.current, &mut self.next);
        }

        let Some(entry) = self.current.last() else {
            return false;
        };
        let exit = entry.start_row == p.len() - 2 && entry.lowest_right <= 1.0;
        exit || (entry.end_row == p.len() - 2 && entry.start_row != p.len() - 2)
    }

    /// Picks the farthest affordable portal out of `row` that stays
    /// inside the reachable span.
    fn choose_portal(
        &self,
        p: &[Point],
        q_vertex: Point,
        head: &SpanEntry,
        row: usize,
        base_delta: f64,
        shortcuts: &ShortcutMap,
    ) -> Option<crate::model::Portal> {
        let bucket = shortcuts.get(&row)?;
        let mut choice = None;
        for portal in bucket {
            if portal.destination > head.end_row {
                // portals are sorted by destination, nothing further fits
                break;
            }
            let segment = segment_frechet(p[portal.source], p[portal.destination], q_vertex);
            if segment + portal.distance <= base_delta {
                choice = Some(*portal);
            }
        }
        choice
    }

    /// Freespace cells touched so far, accumulated across calls.
    pub fn rows_visited(&self) -> usize {
        self.rows_visited
    }

    /// Portal jumps taken so far, accumulated across calls.
    pub fn jumps(&self) -> usize {
        self.jumps
    }
}
