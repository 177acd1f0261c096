//! # Voxel Task System
//!
//! Jobs that build chunks on the background worker, and the results they send back.

pub mod chunk_generation_task;

pub use chunk_generation_task::{ChunkBuildJob, ChunkBuildResult};
