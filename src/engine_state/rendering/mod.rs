//! Rendering side of the voxel engine.
//!
//! This module turns chunks into meshes and hands them to a renderer. The GPU itself
//! lives behind the [`ChunkRenderer`] trait so the streaming core can run against any
//! backend, including the in-memory [`HeadlessRenderer`].

use cgmath::{Matrix4, Point3};

pub mod headless;
pub mod meshing;
pub mod texture;
mod vertex;

// Re-export commonly used types
pub use headless::{HeadlessRenderer, MeshHandle};
pub use meshing::MeshedChunk;
pub use vertex::Vertex;

/// Backend that owns the GPU copies of chunk meshes.
///
/// All calls happen on the main thread.
pub trait ChunkRenderer {
    /// Identifies one uploaded mesh.
    type Handle;

    /// Uploads `mesh` for the chunk at `coordinate` and returns its handle.
    fn upload_mesh(&mut self, coordinate: Point3<i32>, mesh: &MeshedChunk) -> Self::Handle;

    /// Frees the GPU resources behind `handle`.
    fn release_mesh(&mut self, handle: Self::Handle);

    /// Queues a draw of the mesh behind `handle` with the given model transform.
    fn submit(&mut self, handle: &Self::Handle, transform: Matrix4<f32>);
}
