//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling and the default atlas layout.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to the atlas tile `(column, row)` used for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 tiles, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_TILES: [[(u32, u32); 6]; 6] = [
    [(0, 0); 6],                                         // AIR (never meshed)
    [(1, 0), (1, 0), (2, 0), (0, 0), (1, 0), (1, 0)],    // GRASS (top: 0, bottom: 2, sides: 1)
    [(2, 0); 6],                                         // DIRT
    [(3, 0); 6],                                         // STONE
    [(4, 0), (4, 0), (5, 0), (5, 0), (4, 0), (4, 0)],    // WOOD (bark sides, rings on the caps)
    [(6, 0); 6],                                         // LEAVES
];
