pub mod editing;
pub mod geometry;
pub mod persist;

// Re-export key types for easier usage
pub use editing::{block::*, document::*, navigation::*, session::*};
pub use geometry::*;
pub use persist::*;
