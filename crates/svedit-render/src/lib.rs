pub mod hit;
pub mod outline;

pub use hit::{contains_point, hit_test};
pub use outline::{SelectionOutline, selection_outline};
