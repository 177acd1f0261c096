//! Mesh generation for voxel rendering.
//!
//! This module converts chunk data into GPU-friendly vertex and index buffers. It
//! implements greedy meshing to reduce the number of quads by combining coplanar faces
//! with the same block type and orientation.
//!
//! # Architecture
//! - [`MeshedChunk`]: vertices and indices of one meshed chunk
//! - [`Face`]: a merged rectangle of unit faces on one slice of the chunk
//! - [`greedy_mesh`]: sweeps the chunk and turns visible faces into quads
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_streaming::engine_state::rendering::{meshing::greedy_mesh, texture::SolidTint};
//! use voxel_streaming::engine_state::voxels::{block::block_type::BlockType, chunk::Chunk};
//!
//! let mut chunk = Chunk::new(Point3::new(0, 0, 0));
//! chunk.set_block(1, 1, 1, BlockType::STONE);
//! chunk.rebuild_visibility();
//!
//! let mesh = greedy_mesh(&chunk, &SolidTint::default());
//! assert_eq!(mesh.quad_count(), 6);
//! ```

mod face;
mod greedy;
mod mesh;

pub use face::Face;
pub use greedy::{greedy_faces, greedy_mesh};
pub use mesh::MeshedChunk;
