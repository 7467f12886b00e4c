//! Pure data shaping: aggregation, label formatting and comment threading.

pub mod aggregator;
pub mod labels;
pub mod threads;

pub use aggregator::*;
pub use labels::*;
pub use threads::*;
