//! Reified task effects.
//!
//! This module provides the testable representation of effectful
//! computations. Instead of performing a timer, a process spawn, or a
//! network request, a program under test builds a [`Task`] tree whose
//! pending nodes describe the requested effects and carry the continuations
//! needed to resume once a harness supplies a synthetic result.
//!
//! # Components
//!
//! - [`Task`]: the effect node — a closed sum over resolved and pending
//!   computations
//! - `and_then`/`on_error` on [`Task`]: continuation composition that
//!   defers through pending effects
//! - [`PlatformTask`]: the host-side task representation, translated into
//!   effect nodes by [`PlatformTask::normalize`]
//! - [`intercept`]: shims replacing the sleep, spawn, and network-request
//!   primitives
//! - [`EffectRegistry`]: the injection surface binding the three shims
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tasklab::task::{intercept, Task, TaskKind};
//!
//! let node = intercept::sleep(Duration::from_millis(500));
//! match node {
//!     Task::Sleep { delay, next } => {
//!         assert_eq!(delay, Duration::from_millis(500));
//!         assert_eq!(next.kind(), TaskKind::Success);
//!     }
//!     other => panic!("expected Sleep, got {:?}", other.kind()),
//! }
//! ```

// =============================================================================
// Effect Node Model
// =============================================================================

mod node;

pub use node::{ProcessId, Request, RequestOptions, Resume, Task, TaskKind, Value};

// =============================================================================
// Continuation Composer
// =============================================================================

mod compose;

// =============================================================================
// Platform Task Translator
// =============================================================================

mod platform;

pub use platform::PlatformTask;

// =============================================================================
// Effect Interception Shims
// =============================================================================

pub mod intercept;

pub use intercept::{PlatformValue, ResponseDecoder, TaskValue};

// =============================================================================
// Registration Boundary
// =============================================================================

mod registry;

pub use registry::{
    EffectRegistry, EffectRegistryBuilder, MissingSlotError, SendSlot, SleepSlot, SpawnSlot,
};
