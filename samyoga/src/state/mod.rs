//! Shared selector state for pipelines that edit and build on different threads.

mod shared;

pub use shared::{SharedSelectorState, create_shared_state};
