//! Mesh data structures for voxel rendering.
//!
//! A [`MeshedChunk`] is the GPU-ready output of meshing one chunk: a vertex buffer in
//! chunk-local space and a triangle index buffer, two triangles per quad.

use crate::engine_state::rendering::texture::{FaceAttributeSource, FaceAttributes};
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::chunk::Chunk;

use super::{face::Face, greedy};

/// Index pattern of the two triangles making up one quad.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Vertex and index data of one meshed chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshedChunk {
    /// Four vertices per quad, chunk-local positions
    pub vertices: Vec<Vertex>,
    /// Six indices per quad
    pub indices: Vec<u32>,
    quad_count: usize,
}

impl MeshedChunk {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        MeshedChunk::default()
    }

    /// Greedy-meshes `chunk`. See [`greedy::greedy_mesh`].
    pub fn greedy(chunk: &Chunk, attributes: &dyn FaceAttributeSource) -> Self {
        greedy::greedy_mesh(chunk, attributes)
    }

    /// Appends the quad for `face`.
    ///
    /// # Arguments
    /// * `face` - The merged face to emit
    /// * `attributes` - Atlas rectangle and tint shared by all four vertices
    pub fn push_face(&mut self, face: &Face, attributes: &FaceAttributes) {
        let base = self.vertices.len() as u32;
        let normal = face.normal();
        let (corners, uvs) = face.corners();

        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(corner, normal, uv, attributes));
        }
        self.indices.extend(QUAD_INDICES.iter().map(|index| base + index));
        self.quad_count += 1;
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.quad_count == 0
    }
}
