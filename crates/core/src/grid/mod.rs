//! Curtain grid and its adjacency policy

pub mod curtain_grid;
pub mod neighbors;

// Re-export main types
pub use curtain_grid::*;
pub use neighbors::neighbors;
