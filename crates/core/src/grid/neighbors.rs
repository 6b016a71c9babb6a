//! 4-connected adjacency on the curtain
//!
//! Neighbors are produced in a fixed order: down `(x, y+1)`, up `(x, y-1)`,
//! right `(x+1, y)`, left `(x-1, y)`. Out-of-bounds positions are dropped;
//! the curtain does not wrap.

use crate::core_types::Position;

/// Offsets in traversal order: down, up, right, left
const OFFSETS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// In-bounds 4-neighbors of `pos` on a `width` × `height` grid.
#[inline]
pub fn neighbors(pos: Position, width: usize, height: usize) -> impl Iterator<Item = Position> {
    OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Position::new(x, y))
    })
}
