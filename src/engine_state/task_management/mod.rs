//! # Task Management System
//!
//! This module runs background work on a single dedicated worker thread and hands the
//! results back to the main thread without ever blocking it.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the worker thread and both ends of the main-thread side
//! - `Task`: a unit of work that is moved to the worker, processed, and answered
//!
//! ## Channels
//! - Job queue: `std::sync::mpsc` channel from the main thread to the worker. The
//!   worker blocks in `recv`, which wakes on a new job or when the sender is dropped.
//! - Completion queue: `std::sync::mpsc` channel back to the main thread, drained with
//!   non-blocking `try_recv` and a per-call budget.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The worker picks them up in FIFO order, skipping tasks cancelled in the meantime
//! 3. Each task is answered with its output, or with no output if it panicked or was
//!    cancelled
//! 4. Results are collected on the main thread in `process_completed_tasks()`
//!
//! ## Shutdown
//! `shutdown()` raises the stop flag and drops the job sender. The worker finishes the
//! task it is currently running, skips everything still queued, and exits. Results
//! that were still in flight are discarded.
//!
//! ## Example Usage
//! ```
//! use voxel_streaming::engine_state::task_management::{task::Task, TaskManager};
//!
//! struct Square(u32);
//!
//! impl Task for Square {
//!     type Output = u32;
//!     fn process(self) -> u32 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new("square-worker").expect("worker thread");
//! assert!(task_manager.publish_task(Square(3)));
//!
//! // In your main loop:
//! let finished = task_manager.process_completed_tasks(8);
//! # let _ = finished;
//! task_manager.shutdown().expect("clean shutdown");
//! ```

pub mod task;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use task::Task;

use crate::core::WorldError;

/// Manages the background worker and the channels connecting it to the main thread.
///
/// # Fields
/// - `task_sender`: sends tasks to the worker; `None` once shut down
/// - `result_receiver`: receives task outputs from the worker
/// - `num_tasks_in_flight`: tasks published but not yet answered
/// - `num_tasks_cancelled`: tasks the worker skipped because they were cancelled
/// - `stop`: raised on shutdown, checked by the worker before every task
/// - `worker`: handle of the worker thread, joined on shutdown
pub struct TaskManager<T: Task> {
    task_sender: Option<Sender<T>>,
    result_receiver: Receiver<TaskAnswer<T::Output>>,
    num_tasks_in_flight: usize,
    num_tasks_cancelled: usize,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Task> TaskManager<T> {
    /// Creates a new `TaskManager` and starts its worker thread.
    ///
    /// # Arguments
    /// * `name` - Name given to the worker thread
    ///
    /// # Returns
    /// The manager, or `WorldError::WorkerSpawn` if the thread could not be created.
    pub fn new(name: &str) -> Result<Self, WorldError> {
        let (task_tx, task_rx) = channel::<T>();
        let (result_tx, result_rx) = channel::<TaskAnswer<T::Output>>();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let worker_name = name.to_string();

        let task_closure = move || {
            log::info!("{} started", worker_name);

            while let Ok(task) = task_rx.recv() {
                if worker_stop.load(Ordering::Acquire) {
                    break;
                }

                let answer = if task.is_cancelled() {
                    TaskAnswer::Cancelled
                } else {
                    match panic::catch_unwind(AssertUnwindSafe(|| task.process())) {
                        Ok(output) => TaskAnswer::Completed(output),
                        Err(payload) => {
                            log::error!("{}: task panicked: {}", worker_name, panic_message(&*payload));
                            TaskAnswer::Panicked
                        }
                    }
                };

                if result_tx.send(answer).is_err() {
                    break;
                }
            }

            log::info!("{} stopped", worker_name);
        };

        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(task_closure)?;

        Ok(TaskManager {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            num_tasks_in_flight: 0,
            num_tasks_cancelled: 0,
            stop,
            worker: Some(worker),
        })
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was handed to the worker
    /// - `false` if the manager has been shut down; the task is dropped unprocessed
    pub fn publish_task(&mut self, task: T) -> bool {
        let Some(sender) = &self.task_sender else {
            log::trace!("task published after shutdown, dropping it");
            return false;
        };

        match sender.send(task) {
            Ok(_) => {
                self.num_tasks_in_flight += 1;
                true
            }
            Err(_) => {
                log::error!("worker disconnected, dropping task");
                false
            }
        }
    }

    /// Collects at most `max_results` answered tasks without blocking.
    ///
    /// Answers of panicked or cancelled tasks count against the budget but yield no
    /// output.
    pub fn process_completed_tasks(&mut self, max_results: usize) -> Vec<T::Output> {
        let mut outputs = Vec::new();

        for _ in 0..max_results {
            let Ok(answer) = self.result_receiver.try_recv() else {
                break;
            };

            self.num_tasks_in_flight = self.num_tasks_in_flight.saturating_sub(1);
            match answer {
                TaskAnswer::Completed(output) => outputs.push(output),
                TaskAnswer::Cancelled => self.num_tasks_cancelled += 1,
                TaskAnswer::Panicked => {}
            }
        }

        outputs
    }

    /// Number of tasks published but not yet collected.
    pub fn num_tasks_in_flight(&self) -> usize {
        self.num_tasks_in_flight
    }

    /// Number of collected answers for tasks that were skipped as cancelled.
    pub fn num_tasks_cancelled(&self) -> usize {
        self.num_tasks_cancelled
    }

    /// Whether the worker is still accepting tasks.
    pub fn is_running(&self) -> bool {
        self.task_sender.is_some()
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Queued tasks are skipped and unread results are discarded. Calling this more
    /// than once is a no-op.
    ///
    /// # Returns
    /// `WorldError::WorkerPanicked` if the worker thread died outside of a task.
    pub fn shutdown(&mut self) -> Result<(), WorldError> {
        self.stop.store(true, Ordering::Release);
        self.task_sender = None;

        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        let joined = worker.join();

        while self.result_receiver.try_recv().is_ok() {}
        self.num_tasks_in_flight = 0;

        joined.map_err(|_| WorldError::WorkerPanicked)
    }
}

impl<T: Task> Drop for TaskManager<T> {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            log::error!("task manager shutdown failed: {}", error);
        }
    }
}

/// What the worker sends back for each task it took off the queue.
enum TaskAnswer<O> {
    Completed(O),
    Panicked,
    Cancelled,
}

/// Best-effort text of a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
