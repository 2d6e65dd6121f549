//! Continuation composition over effect nodes.
//!
//! Two structural recursion operators with identical shape, differing only
//! in which terminal leaf they interpret: [`Task::and_then`] sequences on
//! success, [`Task::on_error`] sequences on failure. Both are
//! structure-preserving over every pending variant: the effect payload stays
//! put and the follow-up is threaded into the stored continuation, so the
//! effect is still requested first and the follow-up only runs after the
//! harness resolves it.
//!
//! Follow-ups return [`PlatformTask`] values, not plain nodes, because a
//! program under test composes with the host's primitives; whatever they
//! return is normalized back into an effect node on the spot.

use std::rc::Rc;

use super::node::Task;
use super::platform::PlatformTask;

impl<T: 'static, E: 'static> Task<T, E> {
    /// Sequences a follow-up computation after this task succeeds.
    ///
    /// - `Success(v)` applies `callback(v)` and normalizes the result, since
    ///   the callback may itself produce further pending effects or raw
    ///   platform tasks.
    /// - `Failure` and `Never` pass through untouched: failures short-circuit
    ///   without running the callback, and an abandoned computation stays
    ///   abandoned.
    /// - Every pending variant keeps its payload and defers the composition
    ///   into its continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::{PlatformTask, Task};
    ///
    /// let node: Task<i32, String> = Task::Success(3);
    /// let composed = node.and_then(|x| PlatformTask::succeed(x + 1));
    /// assert_eq!(composed.success(), Some(&4));
    ///
    /// let failed: Task<i32, String> = Task::Failure("boom".to_string());
    /// let short_circuited = failed.and_then(|x| PlatformTask::succeed(x + 1));
    /// assert_eq!(short_circuited.failure(), Some(&"boom".to_string()));
    /// ```
    pub fn and_then<U, F>(self, callback: F) -> Task<U, E>
    where
        U: 'static,
        F: Fn(T) -> PlatformTask<U, E> + 'static,
    {
        self.and_then_rc(Rc::new(callback))
    }

    pub(crate) fn and_then_rc<U: 'static>(
        self,
        callback: Rc<dyn Fn(T) -> PlatformTask<U, E>>,
    ) -> Task<U, E> {
        match self {
            Self::Success(value) => callback(value).normalize(),

            Self::Failure(error) => Task::Failure(error),

            Self::Sleep { delay, next } => Task::Sleep {
                delay,
                next: Box::new(next.and_then_rc(callback)),
            },

            Self::Http {
                options,
                on_response,
            } => Task::Http {
                options,
                on_response: Rc::new(move |input| {
                    on_response(input).and_then_rc(Rc::clone(&callback))
                }),
            },

            Self::Spawned { child, next } => Task::Spawned {
                child,
                next: Box::new(next.and_then_rc(callback)),
            },

            Self::Mock { payload, resume } => Task::Mock {
                payload,
                resume: Rc::new(move |input| resume(input).and_then_rc(Rc::clone(&callback))),
            },

            Self::Never => Task::Never,
        }
    }

    /// Sequences a handler after this task fails.
    ///
    /// The mirror image of [`Task::and_then`]: `Failure(e)` applies
    /// `handler(e)` and normalizes the result, `Success` and `Never` pass
    /// through untouched, and every pending variant defers identically.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::{PlatformTask, Task};
    ///
    /// let failed: Task<i32, String> = Task::Failure("boom".to_string());
    /// let recovered: Task<i32, String> =
    ///     failed.on_error(|e| PlatformTask::succeed(e.len() as i32));
    /// assert_eq!(recovered.success(), Some(&4));
    ///
    /// let fine: Task<i32, String> = Task::Success(1);
    /// let untouched: Task<i32, String> =
    ///     fine.on_error(|e| PlatformTask::succeed(e.len() as i32));
    /// assert_eq!(untouched.success(), Some(&1));
    /// ```
    pub fn on_error<F, H>(self, handler: H) -> Task<T, F>
    where
        F: 'static,
        H: Fn(E) -> PlatformTask<T, F> + 'static,
    {
        self.on_error_rc(Rc::new(handler))
    }

    pub(crate) fn on_error_rc<F: 'static>(
        self,
        handler: Rc<dyn Fn(E) -> PlatformTask<T, F>>,
    ) -> Task<T, F> {
        match self {
            Self::Success(value) => Task::Success(value),

            Self::Failure(error) => handler(error).normalize(),

            Self::Sleep { delay, next } => Task::Sleep {
                delay,
                next: Box::new(next.on_error_rc(handler)),
            },

            Self::Http {
                options,
                on_response,
            } => Task::Http {
                options,
                on_response: Rc::new(move |input| {
                    on_response(input).on_error_rc(Rc::clone(&handler))
                }),
            },

            Self::Spawned { child, next } => Task::Spawned {
                child,
                next: Box::new(next.on_error_rc(handler)),
            },

            Self::Mock { payload, resume } => Task::Mock {
                payload,
                resume: Rc::new(move |input| resume(input).on_error_rc(Rc::clone(&handler))),
            },

            Self::Never => Task::Never,
        }
    }

    /// Transforms the success value without touching the effect structure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::Task;
    ///
    /// let node: Task<i32, String> = Task::Success(21);
    /// assert_eq!(node.map(|x| x * 2).success(), Some(&42));
    /// ```
    pub fn map<U, F>(self, function: F) -> Task<U, E>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        self.and_then(move |value| PlatformTask::succeed(function(value)))
    }

    /// Transforms the domain error without touching the effect structure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::Task;
    ///
    /// let node: Task<i32, String> = Task::Failure("boom".to_string());
    /// assert_eq!(node.map_error(|e| e.len()).failure(), Some(&4));
    /// ```
    pub fn map_error<F, H>(self, function: H) -> Task<T, F>
    where
        F: 'static,
        H: Fn(E) -> F + 'static,
    {
        self.on_error(move |error| PlatformTask::fail(function(error)))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use crate::task::{PlatformTask, RequestOptions, Task, TaskKind, Value};

    fn http_echo() -> Task<i32, String> {
        Task::Http {
            options: RequestOptions::new("GET", "/x"),
            on_response: Rc::new(|input: Value| {
                input
                    .downcast_ref::<i32>()
                    .map_or(Task::Failure("expected i32".to_string()), |n| {
                        Task::Success(*n)
                    })
            }),
        }
    }

    #[test]
    fn test_and_then_defers_through_http() {
        let composed = http_echo().and_then(|x| PlatformTask::succeed(x + 1));

        let Task::Http {
            options,
            on_response,
        } = composed
        else {
            panic!("composition must preserve the pending variant");
        };
        assert_eq!(options, RequestOptions::new("GET", "/x"));
        assert_eq!(on_response(Rc::new(41_i32)).success(), Some(&42));
    }

    #[test]
    fn test_and_then_defers_through_sleep() {
        let node: Task<i32, String> = Task::Sleep {
            delay: Duration::from_millis(10),
            next: Box::new(Task::Success(1)),
        };
        let composed = node.and_then(|x| PlatformTask::succeed(x + 1));

        let Task::Sleep { delay, next } = composed else {
            panic!("composition must preserve the pending variant");
        };
        assert_eq!(delay, Duration::from_millis(10));
        assert_eq!(next.success(), Some(&2));
    }

    #[test]
    fn test_and_then_leaves_never_alone() {
        let node: Task<i32, String> = Task::Never;
        let composed = node.and_then(|x| PlatformTask::succeed(x + 1));
        assert_eq!(composed.kind(), TaskKind::Never);
    }

    #[test]
    fn test_on_error_recovers_inside_pending_node() {
        let node: Task<i32, String> = Task::Http {
            options: RequestOptions::new("GET", "/x"),
            on_response: Rc::new(|_| Task::Failure("boom".to_string())),
        };
        let recovered: Task<i32, String> =
            node.on_error(|e| PlatformTask::succeed(e.len() as i32));

        let Task::Http { on_response, .. } = recovered else {
            panic!("composition must preserve the pending variant");
        };
        assert_eq!(on_response(Rc::new(0_i32)).success(), Some(&4));
    }

    #[test]
    fn test_callback_returning_pending_platform_task() {
        let node: Task<i32, String> = Task::Success(5);
        let composed = node.and_then(|x| {
            PlatformTask::Task(Task::Sleep {
                delay: Duration::from_millis(x as u64),
                next: Box::new(Task::Success(x)),
            })
        });

        let Task::Sleep { delay, next } = composed else {
            panic!("callback result must be normalized, not collapsed");
        };
        assert_eq!(delay, Duration::from_millis(5));
        assert_eq!(next.success(), Some(&5));
    }

    #[test]
    fn test_map_and_map_error() {
        let node: Task<i32, String> = Task::Success(21);
        assert_eq!(node.map(|x| x * 2).success(), Some(&42));

        let node: Task<i32, String> = Task::Failure("boom".to_string());
        assert_eq!(node.map_error(|e| e.len()).failure(), Some(&4));
    }
}
