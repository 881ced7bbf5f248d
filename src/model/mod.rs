//! The trajectory record and its freespace-shortcut bookkeeping.

pub mod portal;
pub mod trajectory;

#[doc(inline)]
pub use portal::{Portal, PortalBucket, ShortcutMap};
#[doc(inline)]
pub use trajectory::Trajectory;
