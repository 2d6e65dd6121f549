//! Platform task normalization.
//!
//! The host builds effectful computations out of its own primitives —
//! succeed, fail, bind chains, catch chains, and native bindings. This
//! module mirrors that representation as [`PlatformTask`] and translates it
//! into the inspectable [`Task`] form with [`PlatformTask::normalize`].
//!
//! Bind and catch chains hide an existential intermediate type (the value
//! flowing between the chained task and its callback). That type is erased
//! behind the [`ChainStep`] trait object, so the enum itself stays a closed
//! sum over `T` and `E`.

use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use super::node::Task;

// =============================================================================
// Chain Steps (type-erased bind/catch links)
// =============================================================================

/// A type-erased bind or catch link in a platform task chain.
///
/// Carries the chained task together with its callback, hiding the
/// intermediate value type. `reduce` normalizes the inner task and applies
/// the matching composition operator.
#[doc(hidden)]
pub trait ChainStep<T, E> {
    /// Collapses this link into an effect node.
    fn reduce(self: Box<Self>) -> Task<T, E>;
}

struct AndThenStep<A, T, E> {
    task: PlatformTask<A, E>,
    callback: Rc<dyn Fn(A) -> PlatformTask<T, E>>,
}

impl<A: 'static, T: 'static, E: 'static> ChainStep<T, E> for AndThenStep<A, T, E> {
    fn reduce(self: Box<Self>) -> Task<T, E> {
        self.task.normalize().and_then_rc(self.callback)
    }
}

struct OnErrorStep<X, T, E> {
    task: PlatformTask<T, X>,
    callback: Rc<dyn Fn(X) -> PlatformTask<T, E>>,
}

impl<X: 'static, T: 'static, E: 'static> ChainStep<T, E> for OnErrorStep<X, T, E> {
    fn reduce(self: Box<Self>) -> Task<T, E> {
        self.task.normalize().on_error_rc(self.callback)
    }
}

// =============================================================================
// Platform Task
// =============================================================================

/// The host's native representation of a composed effectful computation.
///
/// A program under test assembles these with [`PlatformTask::succeed`],
/// [`PlatformTask::fail`], [`PlatformTask::and_then`], and
/// [`PlatformTask::on_error`]; interception shims contribute already-built
/// effect nodes through the [`PlatformTask::Task`] pass-through. The
/// translator consumes the value and produces an independent [`Task`] tree.
///
/// # Examples
///
/// ```rust
/// use tasklab::task::{PlatformTask, Task};
///
/// let platform: PlatformTask<i32, String> = PlatformTask::succeed(3)
///     .and_then(|x| PlatformTask::succeed(x + 1))
///     .and_then(|_| PlatformTask::fail("boom".to_string()));
///
/// assert_eq!(platform.normalize().failure(), Some(&"boom".to_string()));
/// ```
pub enum PlatformTask<T, E> {
    /// A computation already resolved with a value.
    Succeed(T),

    /// A computation already resolved with a domain error.
    Fail(E),

    /// A bind chain: a task plus the callback to run on its success.
    AndThen(Box<dyn ChainStep<T, E>>),

    /// A catch chain: a task plus the handler to run on its failure.
    OnError(Box<dyn ChainStep<T, E>>),

    /// An effect node produced earlier, passed through unchanged.
    Task(Task<T, E>),

    /// An un-intercepted primitive effect.
    ///
    /// Normalizing one is a setup defect: the simulation was never told how
    /// to represent this primitive, so translation aborts naming it.
    NativeBinding {
        /// Name of the primitive that was never intercepted.
        name: &'static str,
    },
}

impl<T: 'static, E: 'static> PlatformTask<T, E> {
    /// Wraps a resolved success value.
    pub const fn succeed(value: T) -> Self {
        Self::Succeed(value)
    }

    /// Wraps a resolved domain error.
    pub const fn fail(error: E) -> Self {
        Self::Fail(error)
    }

    /// Marks a primitive effect this simulation does not intercept.
    pub const fn native_binding(name: &'static str) -> Self {
        Self::NativeBinding { name }
    }

    /// Chains a callback to run on this task's success (the host's bind).
    pub fn and_then<U, F>(self, callback: F) -> PlatformTask<U, E>
    where
        U: 'static,
        F: Fn(T) -> PlatformTask<U, E> + 'static,
    {
        PlatformTask::AndThen(Box::new(AndThenStep {
            task: self,
            callback: Rc::new(callback),
        }))
    }

    /// Chains a handler to run on this task's failure (the host's catch).
    pub fn on_error<F, H>(self, handler: H) -> PlatformTask<T, F>
    where
        F: 'static,
        H: Fn(E) -> PlatformTask<T, F> + 'static,
    {
        PlatformTask::OnError(Box::new(OnErrorStep {
            task: self,
            callback: Rc::new(handler),
        }))
    }

    /// Translates this platform task into an effect node.
    ///
    /// - `Succeed`/`Fail` become the terminal leaves.
    /// - Bind and catch chains normalize their inner task and apply the
    ///   matching composition operator.
    /// - Already-produced effect nodes pass through unchanged, so
    ///   normalization is idempotent on them.
    ///
    /// # Panics
    ///
    /// Panics on a [`PlatformTask::NativeBinding`] leaf, naming the
    /// un-intercepted primitive. That is a defect in test setup, not a
    /// runtime condition to recover from: the translator cannot simulate a
    /// primitive it was never told how to intercept, and aborting here
    /// guarantees no partially-built tree escapes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::{PlatformTask, Task, TaskKind};
    ///
    /// let platform: PlatformTask<i32, String> = PlatformTask::succeed(7);
    /// assert_eq!(platform.normalize().success(), Some(&7));
    ///
    /// // Pass-through is idempotent.
    /// let node: Task<i32, String> = Task::Never;
    /// assert_eq!(PlatformTask::Task(node).normalize().kind(), TaskKind::Never);
    /// ```
    pub fn normalize(self) -> Task<T, E> {
        match self {
            Self::Succeed(value) => Task::Success(value),
            Self::Fail(error) => Task::Failure(error),
            Self::AndThen(step) | Self::OnError(step) => step.reduce(),
            Self::Task(node) => node,
            Self::NativeBinding { name } => panic!(
                "native binding '{name}' was not intercepted: register a shim for it \
                 (like the sleep, spawn, and request interceptions) before building tasks"
            ),
        }
    }
}

impl<T, E> From<Task<T, E>> for PlatformTask<T, E> {
    fn from(node: Task<T, E>) -> Self {
        Self::Task(node)
    }
}

impl<T: Debug, E: Debug> Debug for PlatformTask<T, E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeed(value) => formatter.debug_tuple("Succeed").field(value).finish(),
            Self::Fail(error) => formatter.debug_tuple("Fail").field(error).finish(),
            Self::AndThen(_) => formatter.write_str("AndThen(<chain>)"),
            Self::OnError(_) => formatter.write_str("OnError(<chain>)"),
            Self::Task(node) => formatter.debug_tuple("Task").field(node).finish(),
            Self::NativeBinding { name } => formatter
                .debug_struct("NativeBinding")
                .field("name", name)
                .finish(),
        }
    }
}
