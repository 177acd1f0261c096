//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the axis arithmetic the
//! visibility masks and the greedy mesher are built on.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value which doubles as its bit index
/// inside a chunk's per-block visibility mask.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Returns the face pointing along `axis` (0 = X, 1 = Y, 2 = Z) in the
    /// positive or negative direction.
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => BlockSide::RIGHT,
            (0, false) => BlockSide::LEFT,
            (1, true) => BlockSide::TOP,
            (1, false) => BlockSide::BOTTOM,
            (_, true) => BlockSide::FRONT,
            (_, false) => BlockSide::BACK,
        }
    }

    /// The axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(&self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => 0,
            BlockSide::BOTTOM | BlockSide::TOP => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// Whether the face normal points along the positive direction of its axis.
    pub fn is_positive(&self) -> bool {
        matches!(self, BlockSide::RIGHT | BlockSide::TOP | BlockSide::FRONT)
    }

    /// The face on the opposite side of the block.
    pub fn opposite(&self) -> Self {
        Self::from_axis(self.axis(), !self.is_positive())
    }

    /// Unit offset to the neighbouring cell this face looks at.
    pub fn normal(&self) -> Vector3<i32> {
        let mut normal = Vector3::new(0, 0, 0);
        normal[self.axis()] = if self.is_positive() { 1 } else { -1 };
        normal
    }

    /// The bit representing this face in a visibility mask.
    #[inline]
    pub fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}
