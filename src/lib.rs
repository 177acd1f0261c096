#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streaming
//!
//! Generation, greedy meshing and streaming of a chunked voxel world around a moving
//! viewpoint.
//!
//! ## Key Modules
//!
//! * `core` - Error types shared across the crate
//! * `engine_state` - Voxel data, world generation, meshing, task management and the
//!   chunk streamer
//!
//! ## Architecture
//!
//! * Chunks are generated on a single background worker and handed back by value
//! * Meshing and uploads happen on the main thread under a per-frame budget
//! * Rendering backends plug in through the `ChunkRenderer` trait
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = voxel_streaming::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

use std::sync::Arc;
use std::thread;

use cgmath::{Matrix4, Point3, SquareMatrix};
use log::info;
use web_time::{Duration, Instant};

use crate::core::WorldError;
use engine_state::{
    rendering::{texture::TextureAtlas, HeadlessRenderer},
    voxels::{
        generation::{GeneratorConfig, WorldGenerator},
        world::{chunk_model_matrix, StreamingConfig, World},
    },
};

pub mod core;
pub mod engine_state;

/// Frame pacing of the headless demo.
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Number of chunks the demo viewpoint walks along +X.
const DEMO_WALK_DISTANCE: i32 = 6;
/// Frames spent on each chunk of the walk.
const FRAMES_PER_STEP: usize = 20;

/// Runs the headless streaming demo.
///
/// Initializes logging from `RUST_LOG`, then walks a viewpoint across the world one
/// chunk at a time while streaming, meshing and "drawing" into an in-memory renderer.
pub fn run() -> Result<(), WorldError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let start = Instant::now();
    let mut world = World::new(
        StreamingConfig::default(),
        WorldGenerator::new(GeneratorConfig::default()),
        Arc::new(TextureAtlas::with_default_layout((112, 16), (16, 16))),
        HeadlessRenderer::new(),
    )?;

    let view_projection = Matrix4::<f32>::identity();

    for step in 0..=DEMO_WALK_DISTANCE {
        let center = Point3::new(step, 0, 0);

        for _ in 0..FRAMES_PER_STEP {
            world.update_active_chunks(center);
            world.refresh_chunk_meshes();

            world.renderer_mut().begin_frame();
            world.submit_visible(|coordinate| view_projection * chunk_model_matrix(coordinate));

            thread::sleep(FRAME_TIME);
        }

        let stats = world.stats();
        info!(
            "center {:?}: {} active, {} uploaded, {} pending, {} queued, {} draws",
            center,
            stats.active,
            stats.uploaded,
            stats.pending,
            stats.backlog,
            world.renderer().submitted().len()
        );
    }

    world.shutdown();
    info!(
        "demo finished in {:?}: {} uploads, {} releases",
        start.elapsed(),
        world.renderer().uploads(),
        world.renderer().releases()
    );

    Ok(())
}
