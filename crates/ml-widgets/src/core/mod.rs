//! The core types shared by every widget.

pub mod journal;
pub mod metric;
mod ord_items;
pub mod playback;
pub mod point;
mod sized_heap;

pub use journal::Journal;
pub use metric::Metric;
pub use ord_items::{MaxItem, MinItem};
pub use playback::Stepper;
pub use point::Point;
pub use sized_heap::SizedHeap;
