//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format the mesher emits and the renderer uploads.

use cgmath::{Point3, Vector3};

use super::texture::FaceAttributes;

/// A vertex in the voxel rendering pipeline.
///
/// Positions are chunk-local; the renderer places the chunk with a per-chunk
/// transform built from `Chunk::world_origin`.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Local UV: 2x f32 (8 bytes), measured in blocks so merged quads can tile
/// - Atlas Min / Max: 2x 2x f32 (16 bytes)
/// - Tint: 3x f32 (12 bytes)
///
/// Total size: 60 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    local_uv: [f32; 2],
    atlas_min: [f32; 2],
    atlas_max: [f32; 2],
    tint: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Chunk-local position of the vertex
    /// * `normal` - Outward face normal
    /// * `local_uv` - Position of the vertex inside its quad, in blocks
    /// * `attributes` - Atlas rectangle and tint of the face
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        local_uv: [f32; 2],
        attributes: &FaceAttributes,
    ) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            local_uv,
            atlas_min: attributes.uv_min,
            atlas_max: attributes.uv_max,
            tint: attributes.tint,
        }
    }

    /// Chunk-local position.
    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    /// Outward face normal.
    pub fn normal(&self) -> Vector3<f32> {
        Vector3::from(self.normal)
    }

    /// Position inside the quad, in blocks.
    pub fn local_uv(&self) -> [f32; 2] {
        self.local_uv
    }

    /// Lower and upper corner of the atlas tile.
    pub fn atlas_rect(&self) -> ([f32; 2], [f32; 2]) {
        (self.atlas_min, self.atlas_max)
    }

    /// Per-face colour multiplier.
    pub fn tint(&self) -> [f32; 3] {
        self.tint
    }
}
