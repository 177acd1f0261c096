//! # Voxel Streaming Demo Entry Point
//!
//! Runs the headless streaming demo from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(error) = voxel_streaming::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
