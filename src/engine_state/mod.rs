//! # Engine State Module
//!
//! The subsystems of the streaming voxel world.
//!
//! ## Key Components
//!
//! * `voxels` - Blocks, chunks, terrain generation and the chunk streamer (`World`)
//! * `rendering` - Greedy meshing, face appearance and the renderer interface
//! * `task_management` - The background worker and its job and completion channels
//!
//! ## Data Flow
//!
//! 1. `World` decides which chunk coordinates should be resident
//! 2. Missing chunks are generated on the worker via `task_management`
//! 3. Completed chunks are drained on the main thread and meshed by `rendering`
//! 4. Meshes are uploaded through a `ChunkRenderer`

pub mod rendering;
pub mod task_management;
pub mod voxels;
