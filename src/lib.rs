//! # tasklab
//!
//! Reified task effects for deterministic testing.
//!
//! ## Overview
//!
//! tasklab represents asynchronous effects — timers, process spawning,
//! network requests — as inspectable data values instead of performing them.
//! A test harness can then drive a program deterministically: step through
//! pending effects, inject synthetic responses, and assert on the sequence
//! of effects the program requested. It includes:
//!
//! - **Effect Nodes**: a closed [`task::Task`] sum type describing resolved
//!   and pending computations
//! - **Continuation Composition**: `and_then`/`on_error` operators that
//!   thread follow-up computations through pending effects without
//!   collapsing them
//! - **Platform Normalization**: a translator from the host-side
//!   [`task::PlatformTask`] representation into effect nodes
//! - **Interception Shims**: constructors that stand in for the real sleep,
//!   spawn, and network-request primitives
//!
//! ## Example
//!
//! ```rust
//! use tasklab::task::{PlatformTask, Task};
//!
//! let chained: PlatformTask<i32, String> =
//!     PlatformTask::succeed(3).and_then(|x| PlatformTask::succeed(x + 1));
//!
//! match chained.normalize() {
//!     Task::Success(value) => assert_eq!(value, 4),
//!     other => panic!("expected Success, got {:?}", other.kind()),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use tasklab::prelude::*;
/// ```
pub mod prelude {
    pub use crate::task::*;
}

pub mod task;
