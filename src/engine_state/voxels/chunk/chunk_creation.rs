//! # Chunk Creation Module
//!
//! A small builder for filling a chunk cell by cell in storage order
//! (x fastest, then y, then z) and finishing it with a visibility rebuild.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_DIMENSION, CHUNK_SIZE};

/// A builder for creating and populating chunks in storage order.
///
/// Pushing more than `CHUNK_SIZE` blocks is ignored; pushing fewer leaves the
/// remaining cells as air.
pub struct ChunkCreationIterator {
    /// The chunk being filled
    chunk: Chunk,
    /// Number of cells pushed so far
    cursor: i32,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            chunk: Chunk::new(position),
            cursor: 0,
        }
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`
    /// with its visibility masks built.
    pub fn return_chunk(mut self) -> Chunk {
        self.chunk.rebuild_visibility();
        self.chunk
    }

    /// Writes a block at the current position and advances the position.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.cursor >= CHUNK_SIZE {
            return;
        }

        let x = self.cursor % CHUNK_DIMENSION;
        let y = (self.cursor / CHUNK_DIMENSION) % CHUNK_DIMENSION;
        let z = self.cursor / (CHUNK_DIMENSION * CHUNK_DIMENSION);

        if block_type != BlockType::AIR {
            self.chunk.set_block(x, y, z, block_type);
        }

        self.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushes_follow_storage_order() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        cci.push_block_type(BlockType::AIR);
        cci.push_block_type(BlockType::STONE);
        for _ in 0..CHUNK_DIMENSION - 2 {
            cci.push_block_type(BlockType::AIR);
        }
        cci.push_block_type(BlockType::DIRT);
        let chunk = cci.return_chunk();

        assert_eq!(chunk.get_block(1, 0, 0), BlockType::STONE);
        assert_eq!(chunk.get_block(0, 1, 0), BlockType::DIRT);
        assert_eq!(chunk.exposed_face_count(), 12);
    }
}
