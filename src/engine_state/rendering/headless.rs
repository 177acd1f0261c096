//! An in-memory [`ChunkRenderer`] for tools, tests and the demo binary.
//!
//! Uploaded meshes are kept in a slot table. Released slots go back on a free list and
//! are reused by later uploads, the same way GPU buffer slots would be.

use std::collections::VecDeque;

use cgmath::{Matrix4, Point3};

use super::{meshing::MeshedChunk, ChunkRenderer};

/// Handle to a mesh stored in a [`HeadlessRenderer`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub fn slot(&self) -> u32 {
        self.0
    }
}

/// A mesh held by the headless renderer.
#[derive(Debug)]
pub struct UploadedMesh {
    pub coordinate: Point3<i32>,
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Renderer that keeps mesh metadata in memory and records draw submissions.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    slots: Vec<Option<UploadedMesh>>,
    available_slots: VecDeque<u32>,
    submitted: Vec<(MeshHandle, Matrix4<f32>)>,
    uploads: usize,
    releases: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        HeadlessRenderer::default()
    }

    /// Looks up the mesh behind `handle`, if it has not been released.
    pub fn mesh(&self, handle: MeshHandle) -> Option<&UploadedMesh> {
        self.slots.get(handle.0 as usize).and_then(Option::as_ref)
    }

    /// Number of meshes currently held.
    pub fn live_meshes(&self) -> usize {
        self.uploads - self.releases
    }

    /// Total number of uploads since creation.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total number of releases since creation.
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Draws submitted since the last [`HeadlessRenderer::begin_frame`].
    pub fn submitted(&self) -> &[(MeshHandle, Matrix4<f32>)] {
        &self.submitted
    }

    /// Forgets the previous frame's submissions.
    pub fn begin_frame(&mut self) {
        self.submitted.clear();
    }
}

impl ChunkRenderer for HeadlessRenderer {
    type Handle = MeshHandle;

    fn upload_mesh(&mut self, coordinate: Point3<i32>, mesh: &MeshedChunk) -> MeshHandle {
        let uploaded = UploadedMesh {
            coordinate,
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
        };

        let slot = match self.available_slots.pop_front() {
            Some(slot) => {
                self.slots[slot as usize] = Some(uploaded);
                slot
            }
            None => {
                self.slots.push(Some(uploaded));
                (self.slots.len() - 1) as u32
            }
        };

        self.uploads += 1;
        log::trace!("uploaded mesh for chunk {:?} into slot {}", coordinate, slot);
        MeshHandle(slot)
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        match self.slots.get_mut(handle.0 as usize).and_then(Option::take) {
            Some(_) => {
                self.available_slots.push_back(handle.0);
                self.releases += 1;
            }
            None => log::warn!("release of unknown mesh slot {}", handle.0),
        }
    }

    fn submit(&mut self, handle: &MeshHandle, transform: Matrix4<f32>) {
        self.submitted.push((*handle, transform));
    }
}
