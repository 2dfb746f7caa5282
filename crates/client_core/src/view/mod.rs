mod index;
mod params;
mod tree;

pub use index::ViewIndex;
pub use params::{ViewParamsBuilder, DEFAULT_VIEW_DATA};
pub use tree::{ViewTree, ViewTreeError, Walk};
