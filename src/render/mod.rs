//! Text rendering for operator review.

mod side_by_side;

pub use side_by_side::{side_by_side, LayoutError, LayoutOptions};
