//! Double-and-search on integer ranges and binary search on real
//! intervals, both driven by caller-supplied predicates.

/// Steering decision of a [`binary_search_real`] predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refine {
    /// The probed value satisfies the criterion; continue in the upper
    /// half.
    Up,
    /// Continue in the lower half.
    Down,
    /// Stop searching.
    Stop,
}

/// Binary search on the integer range `(lower, upper)`.
///
/// Assumes `f(lower)` holds and returns the largest index in the range
/// for which `f` still holds.
pub fn binary_search_int<F>(f: &mut F, upper: usize, mut lower: usize) -> usize
where
    F: FnMut(usize) -> bool,
{
    let mut upper = upper;
    while upper - lower > 1 {
        let middle = lower + (upper - lower) / 2;
        if f(middle) {
            lower = middle;
        } else {
            upper = middle;
        }
    }
    lower
}

/// Finds the largest `k` in `[start, end)` for which the monotone
/// predicate `f` holds.
///
/// Probes `start`, then grows the step by `base^(exponent_step * i)`,
/// bounded to `end - 1`; the first failing probe triggers a binary
/// refinement between the last two probes. When probing reaches
/// `end - 1` with `f` still true, that index is the answer.
pub fn double_and_search<F>(
    mut f: F,
    start: usize,
    end: usize,
    base: f64,
    exponent_step: f64,
) -> usize
where
    F: FnMut(usize) -> bool,
{
    let mut k = start;
    let mut prevk = start;
    let mut iteration = 0;
    loop {
        if k > end - 1 {
            k = end - 1;
        }
        if !f(k) {
            return binary_search_int(&mut f, k, prevk);
        }
        if k == end - 1 {
            return k;
        }
        prevk = k;
        k += base.powf(exponent_step * f64::from(iteration)).floor() as usize;
        iteration += 1;
    }
}

/// Binary search on the real interval `(lower, upper)`.
///
/// The predicate inspects the probed value and steers the search; it is
/// responsible for stopping, typically after a fixed probe budget.
pub fn binary_search_real<F>(mut f: F, mut upper: f64, mut lower: f64)
where
    F: FnMut(f64) -> Refine,
{
    loop {
        let middle = lower + (upper - lower) / 2.0;
        match f(middle) {
            Refine::Up => lower = middle,
            Refine::Down => upper = middle,
            Refine::Stop => return,
        }
    }
}
