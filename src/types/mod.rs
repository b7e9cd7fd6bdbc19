//! Data types for layout reconstruction.

mod document;
mod scene;

pub use document::*;
pub use scene::*;
