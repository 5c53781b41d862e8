//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod matrix;
pub mod tick;

pub use matrix::matrix_task;
pub use tick::tick_task;
