use geo::{Distance, Euclidean, Point};

use crate::geom::edge_interval;
use crate::model::Trajectory;

/// A reachable interval on the right edge of one row.
#[derive(Clone, Copy, Debug, Default)]
struct QEntry {
    row: usize,
    lowest_right: f64,
}

/// Decision Fréchet solver without jump administration.
///
/// Unused by the query pipeline, but it decides exactly the same
/// predicate as [`CdfShortcuts`](crate::frechet::CdfShortcuts) and pins
/// its behavior in the parity tests.
#[derive(Debug, Default)]
pub struct CdfQueued {
    current: Vec<QEntry>,
    next: Vec<QEntry>,
    rows_visited: usize,
}

impl CdfQueued {
    /// Decides `d_F(p, q) <= delta`.
    pub fn decide(&mut self, p: &Trajectory, q: &Trajectory, delta: f64) -> bool {
        self.decide_points(&p.points, &q.points, delta)
    }

    /// Decides on raw vertex arrays. Rows of the diagram correspond to
    /// segments of `p`, columns to segments of `q`.
    pub fn decide_points(&mut self, p: &[Point], q: &[Point], delta: f64) -> bool {
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
        self.current.push(QEntry {
            row: 0,
            lowest_right: 0.0,
        });

        for column in 0..q.len() - 1 {
            if self.current.is_empty() {
                // nothing reachable anymore
                return false;
            }
            self.next.clear();

            let mut row = self.current[0].row;
            let mut qi = 0;
            // while there's reachable cells left in the queue
            while qi < self.current.len() {
                let mut left_most_top = 2.0;
                // start at the reachable cell at the head of the queue and
                // continue until reachability cannot propagate, consuming
                // the queue as we progress
                loop {
                    let outside = qi >= self.current.len();

                    let right = edge_interval(q[column + 1], p[row], p[row + 1], delta);
                    if let Some(right) = &right {
                        if left_most_top <= 1.0 {
                            // entered through the top of the previous cell
                            self.next.push(QEntry {
                                row,
                                lowest_right: right.start,
                            });
                        } else if !outside {
                            let head = self.current[qi];
                            if row == head.row && head.lowest_right <= right.end {
                                // entered through the left edge
                                self.next.push(QEntry {
                                    row,
                                    lowest_right: head.lowest_right.max(right.start),
                                });
                            }
                        }
                    }

                    let top = edge_interval(p[row + 1], q[column], q[column + 1], delta);
                    if !outside && row == self.current[qi].row {
                        // consume the queue entry of this row
                        qi += 1;
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

        match self.current.last() {
            Some(entry) => entry.row == p.len() - 2 && entry.lowest_right <= 1.0,
            None => false,
        }
    }

    /// Freespace cells touched so far, accumulated across calls.
    pub fn rows_visited(&self) -> usize {
        self.rows_visited
    }
}
