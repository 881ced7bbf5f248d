//! Continuous decision Fréchet over the freespace diagram.
//!
//! Both solvers sweep the diagram column by column and only ever touch
//! the reachable frontier, kept as a queue of reachable intervals per
//! column. [`CdfShortcuts`] additionally leaps over reachable intervals
//! through simplification portals; [`CdfQueued`] is the plain variant
//! kept for correctness testing and performance comparisons.

pub mod queued;
pub mod shortcuts;

#[doc(inline)]
pub use queued::CdfQueued;
#[doc(inline)]
pub use shortcuts::CdfShortcuts;
