//! Error types for the streaming world

use thiserror::Error;

/// Errors raised while setting up or tearing down the world's background worker.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("worker thread panicked outside of a task")]
    WorkerPanicked,
}
