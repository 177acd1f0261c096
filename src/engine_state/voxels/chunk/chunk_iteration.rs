//! # Chunk Iteration Module
//!
//! This module provides an iterator for traversing all non-air blocks in a chunk.
//! It uses the chunk's `solid_array` bit vector to skip over air quickly.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_DIMENSION};

/// An iterator over all non-air blocks in a chunk, in storage order
/// (x fastest, then y, then z).
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current position in the solid array
    current_solid_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_solid_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        let solid_array = &self.chunk_ref.solid_array;

        while self.current_solid_offset < solid_array.len()
            && !solid_array[self.current_solid_offset]
        {
            self.current_solid_offset += 1;
        }

        if self.current_solid_offset >= solid_array.len() {
            return None;
        }

        let index = self.current_solid_offset;
        self.current_solid_offset += 1;

        let dimension = CHUNK_DIMENSION as usize;
        let position = Point3::new(
            index % dimension,
            (index / dimension) % dimension,
            index / (dimension * dimension),
        );

        Some((position, self.chunk_ref.blocks[index]))
    }
}
