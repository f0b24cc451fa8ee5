//! Core traits for platform-agnostic state access.
//!
//! The return-to-base controller is a plain value; these traits decide how
//! it is shared between the tasks that feed it and the tasks that read its
//! status.
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyState<T>` (critical-section Mutex)
//! - `MockState<T>` is always available for host testing

pub mod sync;

pub use sync::{MockState, SharedState};

#[cfg(feature = "embassy")]
pub use sync::EmbassyState;
