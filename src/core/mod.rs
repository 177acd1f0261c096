//! # Core Module
//!
//! Types shared by every part of the engine that are not tied to voxels or rendering.

pub mod error;

pub use error::WorldError;
