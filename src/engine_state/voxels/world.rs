//! # World Module
//!
//! This module provides the `World` struct which streams chunks around a moving
//! viewpoint. It decides which chunk coordinates should be resident, generates missing
//! chunks on the background worker, meshes them on the main thread under a per-call
//! budget and hands the meshes to a [`ChunkRenderer`].
//!
//! ## Chunk Lifecycle
//!
//! ```text
//! Unloaded -> PendingGeneration -> Active { dirty: true } -> Active { dirty: false }
//!     ^                                                                 |
//!     +------------------------- evicted -------------------------------+
//! ```
//!
//! ## Streaming Model
//!
//! The resident set is a horizontal square of `(2r + 1)²` chunk coordinates around the
//! center, all on the center's chunk layer. Missing coordinates are kept in a backlog
//! sorted nearest-first and fed to the worker a few at a time.
//!
//! Every submission carries a ticket. A result is only accepted when its coordinate is
//! still pending with the same ticket, so chunks that were evicted (and maybe desired
//! again) while their job was in flight are silently dropped. Evicting or resubmitting
//! a coordinate also raises the old job's cancellation flag, so a job the worker has
//! not started yet is skipped instead of built and thrown away.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by chunk coordinate
//! - `update_active_chunks` and `refresh_chunk_meshes` never block on the worker
//! - Each call does a bounded amount of work, set by `StreamingConfig`

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::core::WorldError;
use crate::engine_state::{
    rendering::{
        meshing::greedy_mesh, texture::FaceAttributeSource, ChunkRenderer, MeshedChunk,
    },
    task_management::TaskManager,
    voxels::{
        chunk::{chunk_world_origin, Chunk},
        generation::WorldGenerator,
        tasks::{ChunkBuildJob, ChunkBuildResult},
    },
};

/// Name of the chunk build worker thread.
const WORKER_NAME: &str = "chunk-builder";

/// Budgets and radius of the chunk streamer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Horizontal radius of the resident square, in chunks. Clamped to at least 1.
    pub render_distance: i32,
    /// Jobs submitted per `update_active_chunks` call and per backlog top-up.
    pub max_jobs_per_update: usize,
    /// Completed jobs drained per `refresh_chunk_meshes` call.
    pub max_results_per_refresh: usize,
    /// Chunks meshed and uploaded per `refresh_chunk_meshes` call.
    pub max_mesh_rebuilds_per_refresh: usize,
    /// Mesh chunks on the worker instead of the main thread.
    pub mesh_on_worker: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            render_distance: 2,
            max_jobs_per_update: 2,
            max_results_per_refresh: 4,
            max_mesh_rebuilds_per_refresh: 2,
            mesh_on_worker: false,
        }
    }
}

/// Where a chunk coordinate currently is in the streaming pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    Unloaded,
    PendingGeneration,
    Active { dirty: bool },
}

/// A resident chunk together with its renderer handle.
#[derive(Debug)]
pub struct ActiveChunk<H> {
    chunk: Box<Chunk>,
    handle: Option<H>,
    dirty: bool,
    prebuilt_mesh: Option<MeshedChunk>,
}

impl<H> ActiveChunk<H> {
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Handle of the uploaded mesh, `None` until the first upload or when the chunk
    /// has no visible faces.
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Whether the uploaded mesh is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Snapshot of the streamer's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub active: usize,
    pub pending: usize,
    pub backlog: usize,
    pub dirty: usize,
    pub uploaded: usize,
    pub jobs_in_flight: usize,
    /// Jobs skipped by the worker because they were cancelled, since creation.
    pub jobs_cancelled: usize,
}

/// Bookkeeping for a submitted job.
#[derive(Debug)]
struct PendingJob {
    ticket: u64,
    cancelled: Arc<AtomicBool>,
}

impl PendingJob {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// Streams a voxel world around a moving center chunk.
///
/// All methods must be called from the thread that owns the `World`; chunk generation
/// runs on a single background worker owned by the world.
///
/// # Examples
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use cgmath::Point3;
/// use voxel_streaming::engine_state::rendering::{texture::SolidTint, HeadlessRenderer};
/// use voxel_streaming::engine_state::voxels::{
///     generation::{GeneratorConfig, WorldGenerator},
///     world::{StreamingConfig, World},
/// };
///
/// let mut world = World::new(
///     StreamingConfig::default(),
///     WorldGenerator::new(GeneratorConfig::default()),
///     Arc::new(SolidTint::default()),
///     HeadlessRenderer::new(),
/// )?;
///
/// // Once per frame:
/// world.update_active_chunks(Point3::new(0, 0, 0));
/// world.refresh_chunk_meshes();
/// # Ok::<(), voxel_streaming::core::WorldError>(())
/// ```
pub struct World<R: ChunkRenderer> {
    config: StreamingConfig,
    generator: Arc<WorldGenerator>,
    attributes: Arc<dyn FaceAttributeSource + Send + Sync>,
    renderer: R,
    task_manager: TaskManager<ChunkBuildJob>,
    active: HashMap<Point3<i32>, ActiveChunk<R::Handle>>,
    /// Coordinates with a job in flight, mapped to the latest submission.
    pending: HashMap<Point3<i32>, PendingJob>,
    desired: HashSet<Point3<i32>>,
    /// Desired coordinates not yet submitted, nearest first.
    backlog: VecDeque<Point3<i32>>,
    center: Option<Point3<i32>>,
    next_ticket: u64,
    shut_down: bool,
}

impl<R: ChunkRenderer> World<R> {
    /// Creates a world and starts its worker thread.
    ///
    /// # Arguments
    /// * `config` - Streaming radius and per-call budgets
    /// * `generator` - Terrain generator, shared with the worker
    /// * `attributes` - Face appearance used by the mesher
    /// * `renderer` - Receives mesh uploads, releases and draw submissions
    pub fn new(
        mut config: StreamingConfig,
        generator: WorldGenerator,
        attributes: Arc<dyn FaceAttributeSource + Send + Sync>,
        renderer: R,
    ) -> Result<Self, WorldError> {
        config.render_distance = config.render_distance.max(1);
        let task_manager = TaskManager::new(WORKER_NAME)?;

        log::info!(
            "world created with render distance {} ({} jobs per update, {} mesh rebuilds per refresh)",
            config.render_distance,
            config.max_jobs_per_update,
            config.max_mesh_rebuilds_per_refresh
        );

        Ok(World {
            config,
            generator: Arc::new(generator),
            attributes,
            renderer,
            task_manager,
            active: HashMap::new(),
            pending: HashMap::new(),
            desired: HashSet::new(),
            backlog: VecDeque::new(),
            center: None,
            next_ticket: 0,
            shut_down: false,
        })
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Sets the streaming radius, clamped to at least 1. Takes effect on the next
    /// `update_active_chunks` call.
    pub fn set_render_distance(&mut self, render_distance: i32) {
        self.config.render_distance = render_distance.max(1);
        log::info!("render distance set to {} chunks", self.config.render_distance);
    }

    pub fn render_distance(&self) -> i32 {
        self.config.render_distance
    }

    /// Recomputes the resident set around `center`.
    ///
    /// Chunks outside the new set are released together with their meshes, and their
    /// in-flight jobs are cancelled. Missing chunks are queued nearest-first and at most
    /// `max_jobs_per_update` of them are submitted to the worker.
    pub fn update_active_chunks(&mut self, center: Point3<i32>) {
        if self.shut_down {
            return;
        }

        self.center = Some(center);
        self.desired = desired_coordinates(center, self.config.render_distance);

        let evicted: Vec<Point3<i32>> = self
            .active
            .keys()
            .filter(|coordinate| !self.desired.contains(coordinate))
            .copied()
            .collect();

        for coordinate in &evicted {
            if let Some(active) = self.active.remove(coordinate) {
                if let Some(handle) = active.handle {
                    self.renderer.release_mesh(handle);
                }
                log::trace!("unloaded chunk {:?}", coordinate);
            }
        }

        let desired = &self.desired;
        self.pending.retain(|coordinate, job| {
            let keep = desired.contains(coordinate);
            if !keep {
                job.cancel();
            }
            keep
        });

        self.rebuild_backlog(center);
        let submitted = self.submit_from_backlog();

        log::debug!(
            "center {:?}: evicted {}, submitted {}, backlog {}",
            center,
            evicted.len(),
            submitted,
            self.backlog.len()
        );
    }

    /// Per-frame main-thread work.
    ///
    /// 1. Drains at most `max_results_per_refresh` completed jobs, discarding stale ones
    /// 2. Meshes and uploads at most `max_mesh_rebuilds_per_refresh` dirty chunks,
    ///    nearest first
    /// 3. Tops up the worker from the backlog
    pub fn refresh_chunk_meshes(&mut self) {
        if self.shut_down {
            return;
        }

        let results = self
            .task_manager
            .process_completed_tasks(self.config.max_results_per_refresh);
        let drained = results.len();
        let mut accepted = 0;
        for result in results {
            if self.accept_result_ticket(&result) {
                self.insert_result(result);
                accepted += 1;
            }
        }

        let meshed = self.rebuild_dirty_meshes();
        let submitted = self.submit_from_backlog();

        if drained + meshed + submitted > 0 {
            log::debug!(
                "refresh: accepted {}/{} results, meshed {}, submitted {}",
                accepted,
                drained,
                meshed,
                submitted
            );
        }
    }

    /// Requests a new mesh for the chunk at `coordinate`. Does nothing if the chunk is
    /// not active.
    ///
    /// With `mesh_on_worker` a copy of the chunk is sent back to the worker to rebuild
    /// its visibility and mesh; otherwise the visibility is rebuilt here and the chunk
    /// is meshed by a later `refresh_chunk_meshes` call.
    pub fn mark_chunk_dirty(&mut self, coordinate: Point3<i32>) {
        if self.shut_down {
            return;
        }
        let Some(active) = self.active.get_mut(&coordinate) else {
            return;
        };

        if !self.config.mesh_on_worker {
            active.chunk.rebuild_visibility();
            active.prebuilt_mesh = None;
            active.dirty = true;
            return;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let job = ChunkBuildJob::rebuild(active.chunk.clone(), ticket, Arc::clone(&self.generator))
            .with_mesh(Arc::clone(&self.attributes));
        let cancelled = job.cancellation_flag();

        if self.task_manager.publish_task(job) {
            if let Some(previous) = self.pending.insert(coordinate, PendingJob { ticket, cancelled }) {
                previous.cancel();
            }
            log::trace!("rebuild of chunk {:?} sent to the worker", coordinate);
        }
    }

    /// Mutable access to an active chunk's blocks. Call `mark_chunk_dirty` after editing.
    pub fn chunk_mut(&mut self, coordinate: Point3<i32>) -> Option<&mut Chunk> {
        self.active.get_mut(&coordinate).map(|active| active.chunk.as_mut())
    }

    /// Stops the worker, drops every queue and releases all active chunks and meshes.
    /// Calling it more than once is a no-op.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for job in self.pending.values() {
            job.cancel();
        }

        if let Err(error) = self.task_manager.shutdown() {
            log::error!("chunk worker did not stop cleanly: {}", error);
        }

        self.pending.clear();
        self.backlog.clear();
        self.desired.clear();

        let released = self.active.len();
        for (_, active) in self.active.drain() {
            if let Some(handle) = active.handle {
                self.renderer.release_mesh(handle);
            }
        }

        log::info!("world shut down, released {} chunks", released);
    }

    /// Iterates over the resident chunks.
    pub fn active_chunks(&self) -> impl Iterator<Item = (&Point3<i32>, &ActiveChunk<R::Handle>)> {
        self.active.iter()
    }

    /// Submits every uploaded chunk mesh to the renderer.
    ///
    /// # Arguments
    /// * `transform` - Maps a chunk coordinate to the matrix handed to the renderer,
    ///   typically `view_projection * chunk_model_matrix(coordinate)`
    ///
    /// # Returns
    /// The number of submitted chunks.
    pub fn submit_visible<F>(&mut self, mut transform: F) -> usize
    where
        F: FnMut(Point3<i32>) -> Matrix4<f32>,
    {
        let mut submitted = 0;
        for (coordinate, active) in &self.active {
            if let Some(handle) = &active.handle {
                self.renderer.submit(handle, transform(*coordinate));
                submitted += 1;
            }
        }
        submitted
    }

    pub fn chunk_state(&self, coordinate: Point3<i32>) -> ChunkState {
        if let Some(active) = self.active.get(&coordinate) {
            ChunkState::Active {
                dirty: active.dirty,
            }
        } else if self.pending.contains_key(&coordinate) {
            ChunkState::PendingGeneration
        } else {
            ChunkState::Unloaded
        }
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            active: self.active.len(),
            pending: self.pending.len(),
            backlog: self.backlog.len(),
            dirty: self.active.values().filter(|active| active.dirty).count(),
            uploaded: self.active.values().filter(|active| active.handle.is_some()).count(),
            jobs_in_flight: self.task_manager.num_tasks_in_flight(),
            jobs_cancelled: self.task_manager.num_tasks_cancelled(),
        }
    }

    /// Whether every desired chunk is resident with an up-to-date mesh.
    pub fn is_idle(&self) -> bool {
        self.backlog.is_empty()
            && self.pending.is_empty()
            && self.active.values().all(|active| !active.dirty)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Refills the backlog with desired coordinates that are neither active nor pending.
    fn rebuild_backlog(&mut self, center: Point3<i32>) {
        let mut missing: Vec<Point3<i32>> = self
            .desired
            .iter()
            .filter(|coordinate| {
                !self.active.contains_key(coordinate) && !self.pending.contains_key(coordinate)
            })
            .copied()
            .collect();
        missing.sort_by_key(|coordinate| distance_key(center, *coordinate));

        self.backlog = missing.into();
    }

    /// Submits up to `max_jobs_per_update` generation jobs from the front of the backlog.
    fn submit_from_backlog(&mut self) -> usize {
        let mut submitted = 0;

        while submitted < self.config.max_jobs_per_update {
            let Some(coordinate) = self.backlog.pop_front() else {
                break;
            };
            if !self.desired.contains(&coordinate)
                || self.active.contains_key(&coordinate)
                || self.pending.contains_key(&coordinate)
            {
                continue;
            }

            let ticket = self.next_ticket;
            self.next_ticket += 1;

            let mut job = ChunkBuildJob::generate(coordinate, ticket, Arc::clone(&self.generator));
            if self.config.mesh_on_worker {
                job = job.with_mesh(Arc::clone(&self.attributes));
            }

            let cancelled = job.cancellation_flag();
            if !self.task_manager.publish_task(job) {
                self.backlog.push_front(coordinate);
                break;
            }

            self.pending.insert(coordinate, PendingJob { ticket, cancelled });
            submitted += 1;
        }

        submitted
    }

    /// Whether `result` answers the latest submission for a still desired coordinate.
    fn accept_result_ticket(&self, result: &ChunkBuildResult) -> bool {
        let current = self
            .pending
            .get(&result.coordinate)
            .is_some_and(|job| job.ticket == result.ticket)
            && self.desired.contains(&result.coordinate);

        if !current {
            log::trace!(
                "discarding stale result for chunk {:?} (ticket {})",
                result.coordinate,
                result.ticket
            );
        }
        current
    }

    fn insert_result(&mut self, result: ChunkBuildResult) {
        self.pending.remove(&result.coordinate);

        match self.active.get_mut(&result.coordinate) {
            Some(active) => {
                active.chunk = result.chunk;
                active.prebuilt_mesh = result.mesh;
                active.dirty = true;
            }
            None => {
                self.active.insert(
                    result.coordinate,
                    ActiveChunk {
                        chunk: result.chunk,
                        handle: None,
                        dirty: true,
                        prebuilt_mesh: result.mesh,
                    },
                );
            }
        }

        log::trace!("chunk {:?} is active", result.coordinate);
    }

    /// Meshes and uploads the nearest dirty chunks, returning how many were processed.
    fn rebuild_dirty_meshes(&mut self) -> usize {
        let center = self.center.unwrap_or(Point3::new(0, 0, 0));
        let mut dirty: Vec<Point3<i32>> = self
            .active
            .iter()
            .filter(|(_, active)| active.dirty)
            .map(|(coordinate, _)| *coordinate)
            .collect();
        dirty.sort_by_key(|coordinate| distance_key(center, *coordinate));

        let mut meshed = 0;
        for coordinate in dirty
            .into_iter()
            .take(self.config.max_mesh_rebuilds_per_refresh)
        {
            let Some(active) = self.active.get_mut(&coordinate) else {
                continue;
            };

            let mesh = match active.prebuilt_mesh.take() {
                Some(mesh) => mesh,
                None => {
                    let start = Instant::now();
                    let mesh = greedy_mesh(&active.chunk, self.attributes.as_ref());
                    log::debug!(
                        "meshed chunk {:?}: {} quads in {:?}",
                        coordinate,
                        mesh.quad_count(),
                        start.elapsed()
                    );
                    mesh
                }
            };

            let handle = if mesh.is_empty() {
                None
            } else {
                Some(self.renderer.upload_mesh(coordinate, &mesh))
            };
            if let Some(previous) = std::mem::replace(&mut active.handle, handle) {
                self.renderer.release_mesh(previous);
            }

            active.dirty = false;
            meshed += 1;
        }

        meshed
    }
}

impl<R: ChunkRenderer> Drop for World<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The horizontal square of chunk coordinates within `render_distance` of `center`.
pub fn desired_coordinates(center: Point3<i32>, render_distance: i32) -> HashSet<Point3<i32>> {
    let mut desired = HashSet::new();
    for dx in -render_distance..=render_distance {
        for dz in -render_distance..=render_distance {
            desired.insert(Point3::new(center.x + dx, center.y, center.z + dz));
        }
    }
    desired
}

/// Model matrix placing a chunk's local mesh at its world-space origin.
pub fn chunk_model_matrix(coordinate: Point3<i32>) -> Matrix4<f32> {
    let origin = chunk_world_origin(coordinate);
    Matrix4::from_translation(Vector3::new(
        origin.x as f32,
        origin.y as f32,
        origin.z as f32,
    ))
}

/// Sort key ordering coordinates nearest-first by horizontal distance, ties broken by
/// coordinate.
fn distance_key(center: Point3<i32>, coordinate: Point3<i32>) -> (i64, i32, i32, i32) {
    let dx = (coordinate.x - center.x) as i64;
    let dz = (coordinate.z - center.z) as i64;
    (dx * dx + dz * dz, coordinate.x, coordinate.y, coordinate.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_set_is_a_square() {
        let desired = desired_coordinates(Point3::new(4, 1, -2), 2);
        assert_eq!(desired.len(), 25);
        assert!(desired.contains(&Point3::new(6, 1, 0)));
        assert!(desired.contains(&Point3::new(2, 1, -4)));
        assert!(!desired.contains(&Point3::new(4, 2, -2)));
        assert!(!desired.contains(&Point3::new(7, 1, -2)));
    }

    #[test]
    fn test_distance_key_orders_nearest_first() {
        let center = Point3::new(0, 0, 0);
        let mut coordinates = vec![
            Point3::new(2, 0, 0),
            Point3::new(1, 0, 1),
            Point3::new(0, 0, 0),
            Point3::new(-1, 0, 0),
            Point3::new(1, 0, 0),
        ];
        coordinates.sort_by_key(|coordinate| distance_key(center, *coordinate));

        assert_eq!(
            coordinates,
            vec![
                Point3::new(0, 0, 0),
                Point3::new(-1, 0, 0),
                Point3::new(1, 0, 0),
                Point3::new(1, 0, 1),
                Point3::new(2, 0, 0),
            ]
        );
    }

    #[test]
    fn test_chunk_model_matrix_translates_to_origin() {
        let matrix = chunk_model_matrix(Point3::new(1, -1, 2));
        assert_eq!(matrix.w.truncate(), Vector3::new(32.0, -32.0, 64.0));
    }

    #[test]
    fn test_streaming_config_round_trips_through_json() {
        let config = StreamingConfig {
            render_distance: 5,
            mesh_on_worker: true,
            ..StreamingConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serializable");
        let decoded: StreamingConfig = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(decoded, config);
    }
}
