//! Tree placement, run as a second pass after the terrain columns are filled.

use super::WorldGenerator;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_DIMENSION};

/// Columns closer than this to a chunk edge never grow a tree, so crowns stay inside
/// the chunk that owns the trunk.
pub const TREE_EDGE_MARGIN: i32 = 2;
/// Number of wood blocks stacked on the grass block.
pub const TREE_TRUNK_HEIGHT: i32 = 4;
/// Horizontal reach of the two lower crown layers.
const CROWN_RADIUS: i32 = 2;

/// Places trees on the grass columns of `chunk`.
///
/// # Arguments
/// * `generator` - Source of the per-column placement roll
/// * `chunk` - A freshly populated chunk
/// * `surface_heights` - World-space surface height of every column, indexed `z * CHUNK_DIMENSION + x`
pub fn place_trees(generator: &WorldGenerator, chunk: &mut Chunk, surface_heights: &[i32]) {
    let origin = chunk.world_origin();
    let threshold = generator.config().tree_threshold;

    for z in TREE_EDGE_MARGIN..CHUNK_DIMENSION - TREE_EDGE_MARGIN {
        for x in TREE_EDGE_MARGIN..CHUNK_DIMENSION - TREE_EDGE_MARGIN {
            let surface = surface_heights[(z * CHUNK_DIMENSION + x) as usize];
            let local_y = surface - origin.y;

            // trunk and the crown layer above it must fit
            if local_y < 0 || local_y + TREE_TRUNK_HEIGHT + 1 >= CHUNK_DIMENSION {
                continue;
            }
            if chunk.get_block(x, local_y, z) != BlockType::GRASS {
                continue;
            }
            if generator.decoration_roll(origin.x + x, origin.z + z) <= threshold {
                continue;
            }

            grow_tree(chunk, x, local_y + 1, z);
        }
    }
}

/// Builds one tree whose trunk starts at local `(x, base_y, z)`.
fn grow_tree(chunk: &mut Chunk, x: i32, base_y: i32, z: i32) {
    let top_y = base_y + TREE_TRUNK_HEIGHT - 1;

    for y in base_y..=top_y {
        place_if_air(chunk, x, y, z, BlockType::WOOD);
    }

    for y in top_y - 1..=top_y + 1 {
        let radius = if y > top_y { 1 } else { CROWN_RADIUS };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                // round the corners off the wide layers
                if radius == CROWN_RADIUS && dx.abs() == radius && dz.abs() == radius {
                    continue;
                }
                place_if_air(chunk, x + dx, y, z + dz, BlockType::LEAVES);
            }
        }
    }
}

fn place_if_air(chunk: &mut Chunk, x: i32, y: i32, z: i32, block_type: BlockType) {
    if chunk.get_block(x, y, z) == BlockType::AIR {
        chunk.set_block(x, y, z, block_type);
    }
}
