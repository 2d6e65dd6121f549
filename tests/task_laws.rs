//! Property-based tests for the effect algebra laws.
//!
//! This module verifies the algebraic contract of the composition operators
//! and the translator:
//!
//! - **Left Identity**: `Success(v).and_then(f)` equals `f(v).normalize()`
//! - **Short-Circuit**: `Failure(e).and_then(f)` equals `Failure(e)`
//! - **Pass-Through**: `Success(v).on_error(f)` equals `Success(v)`
//! - **Deferred Composition**: composing through a pending node commutes
//!   with resolving it
//! - **Idempotence**: normalization leaves already-produced nodes unchanged

use std::rc::Rc;

use proptest::prelude::*;
use tasklab::task::{PlatformTask, RequestOptions, Task, TaskKind, Value};

// =============================================================================
// Helper Functions for Tests
// =============================================================================

fn succeed_plus_one(x: i32) -> PlatformTask<i32, String> {
    PlatformTask::succeed(x.wrapping_add(1))
}

fn succeed_double(x: i32) -> PlatformTask<i32, String> {
    PlatformTask::succeed(x.wrapping_mul(2))
}

fn recover_with_length(error: String) -> PlatformTask<i32, String> {
    PlatformTask::succeed(i32::try_from(error.len()).unwrap_or(i32::MAX))
}

fn decode_i32(input: Value) -> Task<i32, String> {
    input
        .downcast_ref::<i32>()
        .map_or(Task::Failure("expected i32".to_string()), |n| {
            Task::Success(*n)
        })
}

fn pending_http() -> Task<i32, String> {
    Task::Http {
        options: RequestOptions::new("GET", "/x"),
        on_response: Rc::new(decode_i32),
    }
}

// =============================================================================
// Bind Laws
// =============================================================================

proptest! {
    /// Left identity: binding onto a success applies and normalizes the
    /// callback immediately.
    #[test]
    fn prop_bind_success_is_left_identity(value in any::<i32>()) {
        let left = Task::<i32, String>::Success(value).and_then(succeed_plus_one);
        let right = succeed_plus_one(value).normalize();

        prop_assert_eq!(left.success(), right.success());
    }
}

proptest! {
    /// Short-circuit: failures propagate without running the callback.
    #[test]
    fn prop_bind_failure_short_circuits(error in ".*") {
        let composed = Task::<i32, String>::Failure(error.clone()).and_then(succeed_plus_one);

        prop_assert_eq!(composed.kind(), TaskKind::Failure);
        prop_assert_eq!(composed.failure(), Some(&error));
    }
}

proptest! {
    /// Binding twice associates the same way as binding the composition.
    #[test]
    fn prop_bind_associates_over_success(value in any::<i32>()) {
        let left = Task::<i32, String>::Success(value)
            .and_then(succeed_plus_one)
            .and_then(succeed_double);
        let right = Task::<i32, String>::Success(value)
            .and_then(|x| succeed_plus_one(x).and_then(succeed_double));

        prop_assert_eq!(left.success(), right.success());
    }
}

// =============================================================================
// Catch Laws
// =============================================================================

proptest! {
    /// Success passes through catch untouched.
    #[test]
    fn prop_catch_success_passes_through(value in any::<i32>()) {
        let composed = Task::<i32, String>::Success(value).on_error(recover_with_length);

        prop_assert_eq!(composed.success(), Some(&value));
    }
}

proptest! {
    /// Catch applies and normalizes the handler on failure.
    #[test]
    fn prop_catch_failure_applies_handler(error in ".*") {
        let left = Task::<i32, String>::Failure(error.clone()).on_error(recover_with_length);
        let right = recover_with_length(error).normalize();

        prop_assert_eq!(left.success(), right.success());
    }
}

// =============================================================================
// Deferred Composition Through Pending Nodes
// =============================================================================

proptest! {
    /// For a pending node with continuation `c`, the continuation of
    /// `node.and_then(f)` applied to `x` equals `c(x).and_then(f)`:
    /// composition commutes with resolution.
    #[test]
    fn prop_bind_commutes_with_resolution(input in any::<i32>()) {
        let composed = pending_http().and_then(succeed_double);

        let Task::Http { options, on_response } = composed else {
            panic!("bind must preserve the pending variant");
        };
        prop_assert_eq!(options, RequestOptions::new("GET", "/x"));

        let resolved_then_composed = on_response(Rc::new(input));
        let composed_after_resolution = decode_i32(Rc::new(input)).and_then(succeed_double);

        prop_assert_eq!(
            resolved_then_composed.success(),
            composed_after_resolution.success()
        );
    }
}

proptest! {
    /// The catch operator defers through pending nodes the same way.
    #[test]
    fn prop_catch_commutes_with_resolution(input in any::<i32>()) {
        let composed = pending_http().on_error(recover_with_length);

        let Task::Http { on_response, .. } = composed else {
            panic!("catch must preserve the pending variant");
        };

        let resolved_then_composed = on_response(Rc::new(input));
        let composed_after_resolution = decode_i32(Rc::new(input)).on_error(recover_with_length);

        prop_assert_eq!(
            resolved_then_composed.success(),
            composed_after_resolution.success()
        );
    }
}

// =============================================================================
// Normalization Idempotence
// =============================================================================

proptest! {
    /// Pass-through normalization leaves a resolved node's payload intact.
    #[test]
    fn prop_normalize_is_idempotent_on_success(value in any::<i32>()) {
        let node: Task<i32, String> = Task::Success(value);
        let normalized = PlatformTask::Task(node).normalize();

        prop_assert_eq!(normalized.success(), Some(&value));
    }
}

proptest! {
    /// Normalizing a resolved platform leaf twice through the pass-through
    /// changes nothing.
    #[test]
    fn prop_normalize_round_trip_preserves_failure(error in ".*") {
        let once = PlatformTask::<i32, String>::fail(error.clone()).normalize();
        let twice = PlatformTask::Task(once).normalize();

        prop_assert_eq!(twice.failure(), Some(&error));
    }
}
