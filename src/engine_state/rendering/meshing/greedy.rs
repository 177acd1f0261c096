//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces with the same block type into larger quads, significantly reducing the number
//! of vertices the renderer has to process.
//!
//! The chunk is swept one axis at a time. For every slice boundary along that axis a
//! 2D mask records which unit faces lie on the boundary, their block type and which
//! way they point. Rectangles of identical mask cells are then grown greedily, first
//! along `u` and then row by row along `v`, and each rectangle becomes one quad.
//!
//! Faces are read from the chunk's visibility masks, so the chunk must have had
//! `Chunk::rebuild_visibility` called after its last edit.

use crate::engine_state::rendering::texture::{FaceAttributeSource, FaceAttributes};
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{Chunk, CHUNK_DIMENSION},
};

use super::{face::Face, mesh::MeshedChunk};

const SIZE: usize = CHUNK_DIMENSION as usize;

/// One entry of the slice mask: the unit face lying on the boundary, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MaskCell {
    block_type: BlockType,
    positive: bool,
}

/// Finds the unit face on boundary `slice` of `axis` at mask position `(u, v)`.
///
/// Boundary `slice` separates cell `slice - 1` from cell `slice`. The face pointing
/// along `+axis` belongs to the cell behind the boundary, the face pointing along
/// `-axis` to the cell in front of it. At most one of them can be visible.
fn face_on_boundary(
    chunk: &Chunk,
    axes: (usize, usize, usize),
    slice: usize,
    u: usize,
    v: usize,
) -> Option<MaskCell> {
    let (axis, u_axis, v_axis) = axes;
    let mut cell = [0i32; 3];
    cell[u_axis] = u as i32;
    cell[v_axis] = v as i32;

    if slice > 0 {
        cell[axis] = slice as i32 - 1;
        if chunk.is_face_visible(cell[0], cell[1], cell[2], BlockSide::from_axis(axis, true)) {
            return Some(MaskCell {
                block_type: chunk.get_block(cell[0], cell[1], cell[2]),
                positive: true,
            });
        }
    }

    if slice < SIZE {
        cell[axis] = slice as i32;
        if chunk.is_face_visible(cell[0], cell[1], cell[2], BlockSide::from_axis(axis, false)) {
            return Some(MaskCell {
                block_type: chunk.get_block(cell[0], cell[1], cell[2]),
                positive: false,
            });
        }
    }

    None
}

/// Greedily merges the filled mask into rectangles, clearing the cells it consumes.
///
/// # Arguments
/// * `mask` - Row-major `SIZE * SIZE` mask indexed `v * SIZE + u`
/// * `axis` - Axis the slice is perpendicular to
/// * `slice` - Boundary index of the slice
/// * `faces` - Output vector for the merged faces
fn merge_mask(mask: &mut [Option<MaskCell>], axis: usize, slice: usize, faces: &mut Vec<Face>) {
    for v in 0..SIZE {
        let mut u = 0;
        while u < SIZE {
            let Some(cell) = mask[v * SIZE + u] else {
                u += 1;
                continue;
            };

            let mut width = 1;
            while u + width < SIZE && mask[v * SIZE + u + width] == Some(cell) {
                width += 1;
            }

            let mut height = 1;
            'grow: while v + height < SIZE {
                let row = (v + height) * SIZE;
                for k in 0..width {
                    if mask[row + u + k] != Some(cell) {
                        break 'grow;
                    }
                }
                height += 1;
            }

            for dv in 0..height {
                let row = (v + dv) * SIZE;
                mask[row + u..row + u + width].fill(None);
            }

            faces.push(Face {
                slice,
                u,
                v,
                width,
                height,
                block_type: cell.block_type,
                block_side: BlockSide::from_axis(axis, cell.positive),
            });

            u += width;
        }
    }
}

/// Collects the merged faces of `chunk` in a deterministic order: axis X, Y, Z, then
/// slice, then `v`, then `u`.
pub fn greedy_faces(chunk: &Chunk) -> Vec<Face> {
    let mut faces = Vec::new();
    let mut mask: Vec<Option<MaskCell>> = vec![None; SIZE * SIZE];

    if chunk.is_empty() {
        return faces;
    }

    for axis in 0..3 {
        let axes = (axis, (axis + 1) % 3, (axis + 2) % 3);

        for slice in 0..=SIZE {
            let mut any = false;
            for v in 0..SIZE {
                for u in 0..SIZE {
                    let cell = face_on_boundary(chunk, axes, slice, u, v);
                    any |= cell.is_some();
                    mask[v * SIZE + u] = cell;
                }
            }

            if any {
                merge_mask(&mut mask, axis, slice, &mut faces);
            }
        }
    }

    faces
}

/// Builds the greedy mesh of `chunk`.
///
/// # Arguments
/// * `chunk` - The chunk to mesh, with up-to-date visibility masks
/// * `attributes` - Appearance lookup, queried once per emitted quad
///
/// # Returns
/// A `MeshedChunk` with chunk-local vertex positions.
pub fn greedy_mesh(chunk: &Chunk, attributes: &dyn FaceAttributeSource) -> MeshedChunk {
    let mut mesh = MeshedChunk::new();

    for face in greedy_faces(chunk) {
        let face_attributes = attributes
            .face_attributes(face.block_type, face.block_side)
            .unwrap_or_else(|| {
                log::warn!(
                    "no face attributes for {:?} {:?}, using defaults",
                    face.block_type,
                    face.block_side
                );
                FaceAttributes::default()
            });
        mesh.push_face(&face, &face_attributes);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Point3, Vector3};

    use super::*;
    use crate::engine_state::rendering::texture::{SolidTint, TextureAtlas};

    fn single_block(x: i32, y: i32, z: i32, block_type: BlockType) -> Chunk {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        chunk.set_block(x, y, z, block_type);
        chunk.rebuild_visibility();
        chunk
    }

    fn random_chunk(seed: u64) -> Chunk {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let block_type = match rng.u8(0..4) {
                        0 => BlockType::STONE,
                        1 => BlockType::DIRT,
                        _ => BlockType::AIR,
                    };
                    chunk.set_block(x, y, z, block_type);
                }
            }
        }
        chunk.rebuild_visibility();
        chunk
    }

    #[test]
    fn test_empty_chunk_has_no_faces() {
        let chunk = Chunk::new(Point3::new(0, 0, 0));
        assert!(greedy_mesh(&chunk, &SolidTint::default()).is_empty());
    }

    #[test]
    fn test_single_block_emits_six_outward_quads() {
        let chunk = single_block(5, 6, 7, BlockType::STONE);
        let mesh = greedy_mesh(&chunk, &SolidTint::default());

        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        let center = Vector3::new(5.5f32, 6.5, 7.5);
        for quad in mesh.vertices.chunks(4) {
            let normal = quad[0].normal();
            let mut quad_center = Vector3::new(0.0f32, 0.0, 0.0);
            for vertex in quad {
                assert_eq!(vertex.normal(), normal);
                let p = vertex.position();
                quad_center += Vector3::new(p.x, p.y, p.z) / 4.0;
            }
            assert!((quad_center - center).dot(normal) > 0.49);
        }
    }

    #[test]
    fn test_winding_matches_emitted_normal() {
        let mesh = greedy_mesh(&random_chunk(7), &SolidTint::default());

        for triangle in mesh.indices.chunks(3) {
            let a = mesh.vertices[triangle[0] as usize];
            let b = mesh.vertices[triangle[1] as usize];
            let c = mesh.vertices[triangle[2] as usize];
            let geometric = (b.position() - a.position()).cross(c.position() - a.position());
            assert!(geometric.normalize().dot(a.normal()) > 0.99);
        }
    }

    #[test]
    fn test_full_plane_collapses_to_one_quad_per_side() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                chunk.set_block(x, 0, z, BlockType::GRASS);
            }
        }
        chunk.rebuild_visibility();

        let faces = greedy_faces(&chunk);
        let top: Vec<_> = faces.iter().filter(|f| f.block_side == BlockSide::TOP).collect();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].slice, 1);
        assert_eq!(top[0].area(), SIZE * SIZE);

        // one quad per side: top, bottom and the four one-block-high rims
        assert_eq!(faces.len(), 6);
    }

    #[test]
    fn test_checkerboard_plane_never_merges() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let block_type = if (x + z) % 2 == 0 {
                    BlockType::STONE
                } else {
                    BlockType::DIRT
                };
                chunk.set_block(x, 0, z, block_type);
            }
        }
        chunk.rebuild_visibility();

        let faces = greedy_faces(&chunk);
        for side in [BlockSide::TOP, BlockSide::BOTTOM] {
            let count = faces.iter().filter(|f| f.block_side == side).count();
            assert_eq!(count, SIZE * SIZE);
        }
        assert!(faces.iter().all(|f| f.area() == 1));
    }

    #[test]
    fn test_checkerboard_volume_emits_one_quad_per_exposed_face() {
        let chunk = Chunk::checkerboard(Point3::new(0, 0, 0), BlockType::STONE);
        let mesh = greedy_mesh(&chunk, &SolidTint::default());

        assert_eq!(mesh.quad_count(), chunk.exposed_face_count());
    }

    #[test]
    fn test_quads_never_exceed_exposed_faces() {
        for seed in 0..4 {
            let chunk = random_chunk(seed);
            let faces = greedy_faces(&chunk);
            let covered: usize = faces.iter().map(Face::area).sum();

            assert!(faces.len() <= chunk.exposed_face_count());
            assert_eq!(covered, chunk.exposed_face_count());
        }
    }

    #[test]
    fn test_faces_never_merge_across_block_types() {
        let chunk = random_chunk(11);
        for face in greedy_faces(&chunk) {
            let (axis, u_axis, v_axis) = face.axes();
            let owner_offset = if face.block_side.is_positive() { 1 } else { 0 };
            for dv in 0..face.height {
                for du in 0..face.width {
                    let mut cell = [0i32; 3];
                    cell[axis] = (face.slice - owner_offset) as i32;
                    cell[u_axis] = (face.u + du) as i32;
                    cell[v_axis] = (face.v + dv) as i32;
                    assert_eq!(chunk.get_block(cell[0], cell[1], cell[2]), face.block_type);
                    assert!(chunk.is_face_visible(cell[0], cell[1], cell[2], face.block_side));
                }
            }
        }
    }

    #[test]
    fn test_meshing_is_deterministic() {
        let chunk = random_chunk(3);
        let atlas = TextureAtlas::with_default_layout((128, 16), (16, 16));

        let first = greedy_mesh(&chunk, &atlas);
        let second = greedy_mesh(&chunk, &atlas);

        assert_eq!(first.indices, second.indices);
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(&first.vertices),
            bytemuck::cast_slice::<_, u8>(&second.vertices)
        );
    }

    #[test]
    fn test_missing_attributes_fall_back_to_defaults() {
        let chunk = single_block(0, 0, 0, BlockType::LEAVES);
        let atlas = TextureAtlas::new((64, 64), (16, 16));
        let mesh = greedy_mesh(&chunk, &atlas);

        assert_eq!(mesh.quad_count(), 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.tint() == FaceAttributes::MISSING.tint));
        assert!(mesh.vertices.iter().all(|v| v.atlas_rect()
            == (FaceAttributes::MISSING.uv_min, FaceAttributes::MISSING.uv_max)));
    }

    #[test]
    fn test_vertices_carry_the_registered_atlas_tile() {
        let chunk = single_block(2, 2, 2, BlockType::STONE);
        let mut atlas = TextureAtlas::new((64, 64), (16, 16));
        for side in BlockSide::all() {
            atlas.register_block_face(BlockType::STONE, side, (1, 2));
        }
        let expected = atlas
            .face_attributes(BlockType::STONE, BlockSide::TOP)
            .expect("registered face");

        let mesh = greedy_mesh(&chunk, &atlas);

        assert_eq!(mesh.triangle_count(), 12);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.atlas_rect(), (expected.uv_min, expected.uv_max));
            assert_eq!(vertex.tint(), expected.tint);
        }
    }
}
