//! Agarwal-style progressive simplification and the equal-time-distance
//! bound that drives it.

pub mod agarwal;
pub mod etd;
pub mod ladder;
pub mod progressive;
pub mod search;
mod test;

#[doc(inline)]
pub use agarwal::AgarwalSimplifier;
#[doc(inline)]
pub use etd::{equal_time, equal_time_distance, Window};
#[doc(inline)]
pub use ladder::EpsilonStats;
#[doc(inline)]
pub use progressive::ProgressiveSimplifier;
