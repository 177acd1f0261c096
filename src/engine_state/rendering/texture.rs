//! Per-face appearance lookup for the mesher.
//!
//! The mesher never touches textures directly. It asks a [`FaceAttributeSource`] for the
//! atlas rectangle and tint of every quad it emits. [`TextureAtlas`] maps block faces to
//! tiles of a grid atlas; [`SolidTint`] colours faces without any texture.

use crate::engine_state::voxels::block::{
    block_side::BlockSide, block_type::BlockType, BLOCK_TYPE_TO_TEXTURE_TILES,
};

/// Atlas rectangle and tint of one block face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceAttributes {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub tint: [f32; 3],
}

impl FaceAttributes {
    /// Used for faces nothing was registered for.
    pub const MISSING: FaceAttributes = FaceAttributes {
        uv_min: [0.0, 0.0],
        uv_max: [0.0, 0.0],
        tint: [1.0, 0.0, 1.0],
    };
}

impl Default for FaceAttributes {
    fn default() -> Self {
        FaceAttributes::MISSING
    }
}

/// Supplies the appearance of block faces to the mesher.
pub trait FaceAttributeSource {
    /// Returns the attributes of `side` of `block_type`, or `None` when nothing is
    /// registered for it.
    fn face_attributes(&self, block_type: BlockType, side: BlockSide) -> Option<FaceAttributes>;
}

/// Maps block faces to tiles of a grid texture atlas.
///
/// UVs are inset by half a texel on every edge so linear filtering never samples the
/// neighbouring tile.
#[derive(Clone, Debug)]
pub struct TextureAtlas {
    texture_size: (u32, u32),
    tile_size: (u32, u32),
    faces: [[Option<FaceAttributes>; 6]; BlockType::COUNT],
}

impl TextureAtlas {
    /// Creates an atlas with no registered faces.
    ///
    /// # Arguments
    /// * `texture_size` - Width and height of the atlas image in texels
    /// * `tile_size` - Width and height of one tile in texels
    pub fn new(texture_size: (u32, u32), tile_size: (u32, u32)) -> Self {
        TextureAtlas {
            texture_size,
            tile_size,
            faces: [[None; 6]; BlockType::COUNT],
        }
    }

    /// Creates an atlas with every non-air block registered according to
    /// `BLOCK_TYPE_TO_TEXTURE_TILES`.
    pub fn with_default_layout(texture_size: (u32, u32), tile_size: (u32, u32)) -> Self {
        let mut atlas = TextureAtlas::new(texture_size, tile_size);

        for (block_index, tiles) in BLOCK_TYPE_TO_TEXTURE_TILES.iter().enumerate() {
            let Some(block_type) = BlockType::from_int(block_index as u8) else {
                continue;
            };
            if !block_type.is_opaque() {
                continue;
            }
            for side in BlockSide::all() {
                atlas.register_block_face(block_type, side, tiles[side as usize]);
            }
        }

        atlas
    }

    /// Assigns the tile at grid position `tile` (column, row) to `side` of `block_type`.
    pub fn register_block_face(&mut self, block_type: BlockType, side: BlockSide, tile: (u32, u32)) {
        self.faces[block_type as usize][side as usize] = Some(self.tile_attributes(tile));
    }

    fn tile_attributes(&self, tile: (u32, u32)) -> FaceAttributes {
        let texel_u = 1.0 / self.texture_size.0 as f32;
        let texel_v = 1.0 / self.texture_size.1 as f32;
        let (tile_w, tile_h) = (self.tile_size.0 as f32, self.tile_size.1 as f32);
        let (column, row) = (tile.0 as f32, tile.1 as f32);

        FaceAttributes {
            uv_min: [
                (column * tile_w + 0.5) * texel_u,
                (row * tile_h + 0.5) * texel_v,
            ],
            uv_max: [
                ((column + 1.0) * tile_w - 0.5) * texel_u,
                ((row + 1.0) * tile_h - 0.5) * texel_v,
            ],
            tint: [1.0, 1.0, 1.0],
        }
    }
}

impl FaceAttributeSource for TextureAtlas {
    fn face_attributes(&self, block_type: BlockType, side: BlockSide) -> Option<FaceAttributes> {
        self.faces[block_type as usize][side as usize]
    }
}

/// Colours every face of a block with a flat tint and the whole unit UV square.
#[derive(Clone, Debug)]
pub struct SolidTint {
    colors: [[f32; 3]; BlockType::COUNT],
}

impl Default for SolidTint {
    fn default() -> Self {
        SolidTint {
            colors: [
                [0.0, 0.0, 0.0],
                [0.36, 0.66, 0.24],
                [0.52, 0.36, 0.22],
                [0.5, 0.5, 0.5],
                [0.4, 0.27, 0.13],
                [0.2, 0.5, 0.15],
            ],
        }
    }
}

impl SolidTint {
    /// Overrides the colour of `block_type`.
    pub fn set_color(&mut self, block_type: BlockType, color: [f32; 3]) {
        self.colors[block_type as usize] = color;
    }
}

impl FaceAttributeSource for SolidTint {
    fn face_attributes(&self, block_type: BlockType, _side: BlockSide) -> Option<FaceAttributes> {
        if !block_type.is_opaque() {
            return None;
        }

        Some(FaceAttributes {
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            tint: self.colors[block_type as usize],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_uvs_are_inset_by_half_a_texel() {
        let mut atlas = TextureAtlas::new((256, 256), (16, 16));
        atlas.register_block_face(BlockType::STONE, BlockSide::TOP, (1, 2));

        let attributes = atlas
            .face_attributes(BlockType::STONE, BlockSide::TOP)
            .expect("registered face");
        assert_eq!(attributes.uv_min, [16.5 / 256.0, 32.5 / 256.0]);
        assert_eq!(attributes.uv_max, [31.5 / 256.0, 47.5 / 256.0]);
    }

    #[test]
    fn test_unregistered_faces_are_missing() {
        let atlas = TextureAtlas::new((64, 64), (16, 16));
        assert_eq!(atlas.face_attributes(BlockType::DIRT, BlockSide::LEFT), None);
    }

    #[test]
    fn test_default_layout_registers_every_solid_block() {
        let atlas = TextureAtlas::with_default_layout((128, 16), (16, 16));

        for side in BlockSide::all() {
            assert_eq!(atlas.face_attributes(BlockType::AIR, side), None);
            for raw in 1..BlockType::COUNT as u8 {
                let block_type = BlockType::from_int(raw).expect("valid block type");
                assert!(atlas.face_attributes(block_type, side).is_some());
            }
        }

        let top = atlas.face_attributes(BlockType::GRASS, BlockSide::TOP).expect("grass top");
        let side = atlas.face_attributes(BlockType::GRASS, BlockSide::FRONT).expect("grass side");
        assert_ne!(top.uv_min, side.uv_min);
    }

    #[test]
    fn test_solid_tint_ignores_air() {
        let mut tint = SolidTint::default();
        tint.set_color(BlockType::STONE, [0.1, 0.2, 0.3]);

        assert_eq!(tint.face_attributes(BlockType::AIR, BlockSide::TOP), None);
        assert_eq!(
            tint.face_attributes(BlockType::STONE, BlockSide::BACK).map(|a| a.tint),
            Some([0.1, 0.2, 0.3])
        );
    }
}
