use geo::Point;

/// A parametric sub-interval of a segment, with `0 <= start <= end <= 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// Whether the interval covers the whole segment.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.start == 0.0 && self.end == 1.0
    }
}

/// Computes the interval along `b1 -> b2` that is within `eps` of `a`, or
/// `None` when no part of the segment is.
///
/// With `L(t) = b1 + t * (b2 - b1)`, solving `|L(t) - a| = eps` squared
/// gives `A t^2 + B t + C = 0` with
///
/// ```text
/// A = |b2 - b1|^2
/// B = 2 ((b2 - b1) . (b1 - a))
/// C = |b1 - a|^2 - eps^2
/// ```
///
/// The two roots are clamped to `[0, 1]`. Consecutive duplicate vertices
/// are dropped at load time, so the segment is never degenerate and `A`
/// stays positive.
#[inline]
pub fn edge_interval(a: Point, b1: Point, b2: Point, eps: f64) -> Option<Interval> {
    let bdx = b2.x() - b1.x();
    let bdy = b2.y() - b1.y();
    let adx = b1.x() - a.x();
    let ady = b1.y() - a.y();

    let qa = bdx * bdx + bdy * bdy;
    let qb = 2.0 * (bdx * adx + bdy * ady);
    let qc = adx * adx + ady * ady - eps * eps;

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-qb - sqrt_disc) / (2.0 * qa);
    let t2 = (-qb + sqrt_disc) / (2.0 * qa);

    if t2 < 0.0 || t1 > 1.0 {
        return None;
    }
    Some(Interval {
        start: t1.max(0.0),
        end: t2.min(1.0),
    })
}
