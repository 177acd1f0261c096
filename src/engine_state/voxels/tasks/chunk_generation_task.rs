//! # Chunk Build Task
//!
//! This module defines the `ChunkBuildJob` which produces a chunk on the background
//! worker. A job either generates a brand new chunk or rebuilds an existing one that
//! the main thread handed over, and optionally meshes the result as well.
//!
//! Every job carries a cancellation flag. The world raises it when the job's coordinate
//! stops being pending, and the worker then skips the job without building anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::{
    rendering::{texture::FaceAttributeSource, MeshedChunk},
    task_management::task::Task,
    voxels::{chunk::Chunk, generation::WorldGenerator},
};

/// A job that builds one chunk on the worker.
///
/// This task is responsible for:
/// 1. Generating the chunk at `coordinate`, unless an existing chunk was supplied
/// 2. Rebuilding the chunk's face visibility
/// 3. Meshing the chunk when a face attribute source was supplied
pub struct ChunkBuildJob {
    /// Chunk grid coordinate the job is for
    pub coordinate: Point3<i32>,
    /// Identifies this submission; results carrying an outdated ticket are discarded
    pub ticket: u64,
    existing_chunk: Option<Box<Chunk>>,
    cancelled: Arc<AtomicBool>,
    generator: Arc<WorldGenerator>,
    mesh_attributes: Option<Arc<dyn FaceAttributeSource + Send + Sync>>,
}

impl ChunkBuildJob {
    /// Creates a job that generates the chunk at `coordinate` from scratch.
    ///
    /// # Arguments
    /// * `coordinate` - The chunk coordinate to generate
    /// * `ticket` - Submission ticket echoed in the result
    /// * `generator` - Shared terrain generator
    pub fn generate(coordinate: Point3<i32>, ticket: u64, generator: Arc<WorldGenerator>) -> Self {
        ChunkBuildJob {
            coordinate,
            ticket,
            existing_chunk: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            generator,
            mesh_attributes: None,
        }
    }

    /// Creates a job that rebuilds an already generated chunk.
    pub fn rebuild(chunk: Box<Chunk>, ticket: u64, generator: Arc<WorldGenerator>) -> Self {
        ChunkBuildJob {
            coordinate: chunk.position(),
            ticket,
            existing_chunk: Some(chunk),
            cancelled: Arc::new(AtomicBool::new(false)),
            generator,
            mesh_attributes: None,
        }
    }

    /// Also mesh the chunk on the worker, using `attributes` for face appearance.
    pub fn with_mesh(mut self, attributes: Arc<dyn FaceAttributeSource + Send + Sync>) -> Self {
        self.mesh_attributes = Some(attributes);
        self
    }

    /// Shared flag that cancels this job when set before the worker picks it up.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Task for ChunkBuildJob {
    type Output = ChunkBuildResult;

    fn process(self) -> ChunkBuildResult {
        let mut chunk = match self.existing_chunk {
            Some(chunk) => chunk,
            None => {
                let mut chunk = Box::new(Chunk::new(self.coordinate));
                self.generator.populate_chunk(&mut chunk);
                chunk
            }
        };

        chunk.rebuild_visibility();

        let mesh = self
            .mesh_attributes
            .map(|attributes| MeshedChunk::greedy(&chunk, attributes.as_ref()));

        ChunkBuildResult {
            coordinate: self.coordinate,
            ticket: self.ticket,
            chunk,
            mesh,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// The result of a chunk build job, handed back to the main thread.
pub struct ChunkBuildResult {
    pub coordinate: Point3<i32>,
    pub ticket: u64,
    pub chunk: Box<Chunk>,
    /// Present when the job was asked to mesh
    pub mesh: Option<MeshedChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::texture::SolidTint;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::generation::GeneratorConfig;

    #[test]
    fn test_generate_job_builds_visibility() {
        let generator = Arc::new(WorldGenerator::new(GeneratorConfig::flat(3)));
        let result = ChunkBuildJob::generate(Point3::new(2, 0, 1), 9, generator).process();

        assert_eq!(result.coordinate, Point3::new(2, 0, 1));
        assert_eq!(result.ticket, 9);
        assert!(result.mesh.is_none());
        assert!(result.chunk.exposed_face_count() > 0);
    }

    #[test]
    fn test_cancellation_flag_is_shared_with_the_job() {
        let generator = Arc::new(WorldGenerator::new(GeneratorConfig::flat(3)));
        let job = ChunkBuildJob::generate(Point3::new(0, 0, 0), 1, generator);
        assert!(!job.is_cancelled());

        job.cancellation_flag().store(true, Ordering::Release);
        assert!(job.is_cancelled());
    }

    #[test]
    fn test_rebuild_job_keeps_the_supplied_blocks() {
        let generator = Arc::new(WorldGenerator::new(GeneratorConfig::default()));
        let mut chunk = Box::new(Chunk::new(Point3::new(0, 5, 0)));
        chunk.set_block(3, 3, 3, BlockType::WOOD);

        let result = ChunkBuildJob::rebuild(chunk, 1, generator)
            .with_mesh(Arc::new(SolidTint::default()))
            .process();

        assert_eq!(result.chunk.get_block(3, 3, 3), BlockType::WOOD);
        assert_eq!(result.chunk.exposed_face_count(), 6);
        assert_eq!(result.mesh.map(|mesh| mesh.quad_count()), Some(6));
    }
}
