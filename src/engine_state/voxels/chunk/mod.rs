//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 32x32x32 blocks of voxel data together with their precomputed face visibility.
//!
//! ## Storage
//!
//! Chunks keep three parallel views of the same cells, all in x-fastest order
//! (`x + CHUNK_DIMENSION * (y + CHUNK_DIMENSION * z)`):
//! - `blocks`: the block type of every cell
//! - `visibility`: a 6-bit mask per cell, one bit per `BlockSide`
//! - `solid_array`: a bit vector (1 bit per block) indicating which blocks are opaque
//!
//! A mask bit is set iff the cell is not air and the neighbour on that side is air.
//! Neighbours outside the chunk are treated as air, so chunk borders always expose
//! their faces.
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1)
//! - **Face Visibility Check**: O(1) - a single bit test
//! - **Visibility Rebuild**: O(n) over all n cells of the chunk

use bitvec::prelude::BitVec;
use cgmath::Point3;
use chunk_creation::ChunkCreationIterator;
use chunk_iteration::ChunkBlockIterator;

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;

mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 32x32x32 collection of voxel blocks in the world.
///
/// Chunks are the unit of generation, meshing and streaming. Each chunk knows its
/// position on the chunk grid (not in block units).
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// Block type of every cell.
    blocks: Vec<BlockType>,

    /// Exposed-face bitmask of every cell, bit index = `BlockSide as u8`.
    visibility: Vec<u8>,

    /// One bit per cell, set when the cell holds an opaque block.
    solid_array: BitVec,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn new(position: Point3<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![BlockType::AIR; CHUNK_SIZE as usize],
            visibility: vec![0; CHUNK_SIZE as usize],
            solid_array: BitVec::repeat(false, CHUNK_SIZE as usize),
        }
    }

    /// Creates a chunk with every cell set to `block_type`, visibility already built.
    pub fn solid(position: Point3<i32>, block_type: BlockType) -> Self {
        let mut cci = ChunkCreationIterator::new(position);

        for _ in 0..CHUNK_SIZE {
            cci.push_block_type(block_type);
        }

        cci.return_chunk()
    }

    /// Creates a new chunk with a 3D checkerboard pattern of `block_type` and air.
    ///
    /// Every opaque cell is isolated, so each one exposes all six faces.
    pub fn checkerboard(position: Point3<i32>, block_type: BlockType) -> Self {
        let mut cci = ChunkCreationIterator::new(position);

        for i in 0..CHUNK_SIZE {
            let x = i % CHUNK_DIMENSION;
            let y = (i / CHUNK_DIMENSION) % CHUNK_DIMENSION;
            let z = i / CHUNK_PLANE_SIZE;
            if (x + y + z) % 2 == 0 {
                cci.push_block_type(block_type);
            } else {
                cci.push_block_type(BlockType::AIR);
            }
        }

        cci.return_chunk()
    }

    /// The chunk-grid position of this chunk.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// World-space block coordinate of this chunk's (0, 0, 0) cell.
    pub fn world_origin(&self) -> Point3<i32> {
        chunk_world_origin(self.position)
    }

    /// Sets the block at the chunk-relative coordinates.
    ///
    /// Coordinates outside `0..CHUNK_DIMENSION` are clamped onto the nearest edge
    /// cell. Visibility is not updated; call `rebuild_visibility` after edits.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        let index = Self::to_index(x, y, z);
        self.blocks[index] = block_type;
        self.solid_array.set(index, block_type.is_opaque());
    }

    /// Gets the block at the chunk-relative coordinates, clamping like `set_block`.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks[Self::to_index(x, y, z)]
    }

    /// Checks if the block at the specified in-bounds coordinates is opaque.
    #[inline]
    pub fn is_block_solid(&self, cx: usize, cy: usize, cz: usize) -> bool {
        let dimension = CHUNK_DIMENSION as usize;
        self.solid_array[cx + dimension * (cy + dimension * cz)]
    }

    /// Like `is_block_solid`, but anything outside the chunk reads as air.
    fn is_opaque_in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        if Self::is_inside_chunk(x, y, z) {
            self.is_block_solid(x as usize, y as usize, z as usize)
        } else {
            false
        }
    }

    /// Recomputes every visibility mask from scratch.
    ///
    /// For each opaque cell and each of the six sides, the face bit is set when the
    /// neighbour on that side is air or lies outside the chunk.
    pub fn rebuild_visibility(&mut self) {
        let sides = BlockSide::all();

        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let index = Self::to_index(x, y, z);
                    if !self.solid_array[index] {
                        self.visibility[index] = 0;
                        continue;
                    }

                    let mut mask = 0u8;
                    for side in sides.iter() {
                        let offset = side.normal();
                        if !self.is_opaque_in_bounds(x + offset.x, y + offset.y, z + offset.z) {
                            mask |= side.bit();
                        }
                    }
                    self.visibility[index] = mask;
                }
            }
        }
    }

    /// Whether `side` of the block at the chunk-relative coordinates is exposed.
    ///
    /// Coordinates are clamped like `get_block`.
    #[inline]
    pub fn is_face_visible(&self, x: i32, y: i32, z: i32, side: BlockSide) -> bool {
        self.visibility[Self::to_index(x, y, z)] & side.bit() != 0
    }

    /// The raw 6-bit visibility mask of a cell.
    pub fn visibility_mask(&self, x: i32, y: i32, z: i32) -> u8 {
        self.visibility[Self::to_index(x, y, z)]
    }

    /// Total number of exposed unit faces in the chunk.
    pub fn exposed_face_count(&self) -> usize {
        self.visibility
            .iter()
            .map(|mask| mask.count_ones() as usize)
            .sum()
    }

    /// Returns `true` when the chunk holds no opaque blocks.
    pub fn is_empty(&self) -> bool {
        self.solid_array.not_any()
    }

    /// Iterates over every non-air block and its chunk-relative position.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Flat index of the clamped coordinates.
    fn to_index(x: i32, y: i32, z: i32) -> usize {
        let clamped_x = x.clamp(0, CHUNK_DIMENSION - 1);
        let clamped_y = y.clamp(0, CHUNK_DIMENSION - 1);
        let clamped_z = z.clamp(0, CHUNK_DIMENSION - 1);

        (clamped_x + CHUNK_DIMENSION * (clamped_y + CHUNK_DIMENSION * clamped_z)) as usize
    }

    fn is_inside_chunk(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_DIMENSION).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }
}

/// World-space block coordinate of the (0, 0, 0) cell of the chunk at `position`.
pub fn chunk_world_origin(position: Point3<i32>) -> Point3<i32> {
    Point3::new(
        position.x * CHUNK_DIMENSION,
        position.y * CHUNK_DIMENSION,
        position.z * CHUNK_DIMENSION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point3<i32> {
        Point3::new(0, 0, 0)
    }

    fn random_chunk(seed: u64, density: f64) -> Chunk {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut chunk = Chunk::new(origin());
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    if rng.f64() < density {
                        let block = BlockType::from_int(rng.u8(1..BlockType::COUNT as u8))
                            .expect("valid block id");
                        chunk.set_block(x, y, z, block);
                    }
                }
            }
        }
        chunk.rebuild_visibility();
        chunk
    }

    #[test]
    fn new_chunk_is_all_air() {
        let chunk = Chunk::new(Point3::new(3, -1, 2));
        assert!(chunk.is_empty());
        assert_eq!(chunk.get_block(5, 5, 5), BlockType::AIR);
        assert_eq!(chunk.exposed_face_count(), 0);
        assert_eq!(chunk.world_origin(), Point3::new(96, -32, 64));
    }

    #[test]
    fn out_of_range_access_is_clamped() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block(-4, 40, 7, BlockType::STONE);

        assert_eq!(chunk.get_block(0, CHUNK_DIMENSION - 1, 7), BlockType::STONE);
        assert_eq!(chunk.get_block(-100, 1000, 7), BlockType::STONE);
        assert_eq!(chunk.get_block(1, CHUNK_DIMENSION - 1, 7), BlockType::AIR);
    }

    #[test]
    fn single_block_exposes_all_six_faces() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block(4, 5, 6, BlockType::DIRT);
        chunk.rebuild_visibility();

        for side in BlockSide::all() {
            assert!(chunk.is_face_visible(4, 5, 6, side), "{side:?}");
        }
        assert_eq!(chunk.visibility_mask(4, 5, 6), 0b11_1111);
        assert_eq!(chunk.exposed_face_count(), 6);
    }

    #[test]
    fn touching_blocks_hide_the_shared_faces() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block(4, 5, 6, BlockType::DIRT);
        chunk.set_block(5, 5, 6, BlockType::STONE);
        chunk.rebuild_visibility();

        assert!(!chunk.is_face_visible(4, 5, 6, BlockSide::RIGHT));
        assert!(!chunk.is_face_visible(5, 5, 6, BlockSide::LEFT));
        assert!(chunk.is_face_visible(4, 5, 6, BlockSide::LEFT));
        assert_eq!(chunk.exposed_face_count(), 10);
    }

    #[test]
    fn air_cells_never_report_visible_faces() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block(1, 1, 1, BlockType::GRASS);
        chunk.rebuild_visibility();
        chunk.set_block(1, 1, 1, BlockType::AIR);
        chunk.rebuild_visibility();

        assert_eq!(chunk.visibility_mask(1, 1, 1), 0);
        assert!(chunk.is_empty());
    }

    #[test]
    fn solid_chunk_only_exposes_its_boundary() {
        let chunk = Chunk::solid(origin(), BlockType::STONE);
        let plane = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;

        assert_eq!(chunk.exposed_face_count(), 6 * plane);
        assert!(chunk.is_face_visible(0, 3, 3, BlockSide::LEFT));
        assert!(!chunk.is_face_visible(0, 3, 3, BlockSide::RIGHT));
        assert!(chunk.is_face_visible(CHUNK_DIMENSION - 1, 3, 3, BlockSide::RIGHT));
    }

    #[test]
    fn visibility_matches_neighbour_definition_for_random_chunks() {
        for seed in [1_u64, 7, 42] {
            let chunk = random_chunk(seed, 0.45);
            for z in 0..CHUNK_DIMENSION {
                for y in 0..CHUNK_DIMENSION {
                    for x in 0..CHUNK_DIMENSION {
                        let opaque = chunk.get_block(x, y, z).is_opaque();
                        for side in BlockSide::all() {
                            let n = side.normal();
                            let (nx, ny, nz) = (x + n.x, y + n.y, z + n.z);
                            let neighbour_air = !Chunk::is_inside_chunk(nx, ny, nz)
                                || !chunk.get_block(nx, ny, nz).is_opaque();
                            assert_eq!(
                                chunk.is_face_visible(x, y, z, side),
                                opaque && neighbour_air,
                                "seed {seed} cell ({x}, {y}, {z}) side {side:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn block_iterator_visits_only_opaque_cells_in_order() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block(2, 0, 0, BlockType::STONE);
        chunk.set_block(0, 1, 0, BlockType::DIRT);
        chunk.set_block(0, 0, 3, BlockType::WOOD);

        let visited: Vec<_> = chunk.blocks().collect();
        assert_eq!(
            visited,
            vec![
                (Point3::new(2, 0, 0), BlockType::STONE),
                (Point3::new(0, 1, 0), BlockType::DIRT),
                (Point3::new(0, 0, 3), BlockType::WOOD),
            ]
        );
    }
}
