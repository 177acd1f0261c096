//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// `AIR` is the sentinel for an empty cell. The `FromPrimitive` derive allows
/// conversion from the compact integer representation.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize,
)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    #[default]
    AIR = 0,

    /// Topmost layer of a terrain column.
    /// The top is green, sides have grass on dirt, and bottom is plain dirt.
    GRASS,

    /// Soil found under the grass layer.
    DIRT,

    /// Bedrock-equivalent filler below the soil.
    STONE,

    /// Tree trunks.
    WOOD,

    /// Tree crowns.
    LEAVES,
}

impl BlockType {
    /// Number of block types, `AIR` included.
    pub const COUNT: usize = 6;

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// The compact integer representation of this block type.
    pub fn as_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this block occludes its neighbours.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self != BlockType::AIR
    }
}
