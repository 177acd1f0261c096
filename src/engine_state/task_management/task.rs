//! # Task System Core Trait
//!
//! A `Task` is a self-contained unit of work that is moved to the worker thread,
//! processed there exactly once, and whose output is moved back to the main thread.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The worker checks `is_cancelled()`; a cancelled task is dropped unprocessed
//! 3. Otherwise the task's `process()` method is called on the worker thread
//! 4. The output is sent back over the completion channel
//! 5. The main thread collects outputs in `TaskManager::process_completed_tasks()`
//!
//! ## Thread Safety
//! - Tasks own all the data they touch; nothing is shared mutably with the main thread
//! - Both the task and its output must be `Send`

/// A unit of work that can be executed on the background worker.
///
/// # Implementation Guidelines
/// - Should own everything it needs, or hold it behind an `Arc` of immutable data
/// - Should be coarse-grained to amortize the channel round trip
/// - A panic inside `process` is caught by the worker and produces no output
pub trait Task: Send + 'static {
    /// The value handed back to the main thread.
    type Output: Send + 'static;

    /// Performs the work. Runs on the worker thread.
    fn process(self) -> Self::Output;

    /// Checked by the worker right before `process`. A cancelled task is answered
    /// without being processed and produces no output.
    fn is_cancelled(&self) -> bool {
        false
    }
}
