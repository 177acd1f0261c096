//! # Voxel World
//!
//! This module contains the voxel data model and everything that produces and streams
//! it.
//!
//! ## Architecture
//!
//! * **Block**: block types and the six block sides
//! * **Chunk**: fixed-size 3D arrays of blocks with precomputed face visibility
//! * **Generation**: deterministic terrain, caves and trees
//! * **Tasks**: the chunk build job run on the background worker
//! * **World**: streams chunks around a moving center and keeps their meshes current
//!
//! ## Data Flow
//!
//! 1. `World` queues build jobs for missing chunk coordinates
//! 2. The worker generates each chunk and rebuilds its visibility
//! 3. `World` accepts the result, meshes the chunk and uploads it
//! 4. Chunks leaving the streaming radius are released with their meshes

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
