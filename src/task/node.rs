//! Effect node model.
//!
//! The [`Task`] type is the heart of the library: a closed, tagged
//! representation of a deferred computation. A resolved computation is a
//! [`Task::Success`] or [`Task::Failure`] leaf; everything else is a pending
//! effect carrying enough information for a harness to drive it forward.
//!
//! Nodes are pure values. Advancing a pending node means invoking its stored
//! continuation with a harness-chosen [`Value`]; doing so twice yields two
//! independent downstream trees, because no node hides shared mutable state.

use std::any::Any;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;
use std::time::Duration;

use static_assertions::assert_impl_all;

// =============================================================================
// Type-Erased Harness Inputs
// =============================================================================

/// A synthetic value supplied by the harness to resume a pending effect.
///
/// Harness-supplied inputs (HTTP responses, mock results) are type-erased:
/// the harness chooses their concrete type and the continuation (or a
/// configured decoder) downcasts them back. `Rc` rather than `Box` because a
/// continuation may be invoked any number of times.
pub type Value = Rc<dyn Any>;

/// A continuation stored in a pending effect node.
///
/// Given an externally supplied [`Value`], produces the next node. The fixed
/// `Fn` signature keeps nodes reusable: every invocation builds a fresh,
/// independent tree.
pub type Resume<T, E> = Rc<dyn Fn(Value) -> Task<T, E>>;

// =============================================================================
// Effect Node
// =============================================================================

/// A reified effectful computation.
///
/// `Task<T, E>` either finished with a `T` (success) or an `E` (domain
/// failure), or is waiting on one of the simulated effects. Pending variants
/// store the payload a harness inspects plus the continuation that resumes
/// the computation.
///
/// # Equality
///
/// `Task` deliberately does not implement `PartialEq`: continuations are
/// opaque callables and cannot be meaningfully compared. Harness assertions
/// should compare [`Task::kind`] and payload fields (delay, request options,
/// process handle) instead of whole nodes.
///
/// # Examples
///
/// ```rust
/// use tasklab::task::{Task, TaskKind};
///
/// let done: Task<i32, String> = Task::Success(42);
/// assert_eq!(done.kind(), TaskKind::Success);
/// assert_eq!(done.success(), Some(&42));
/// assert!(!done.is_pending());
/// ```
pub enum Task<T, E> {
    /// The computation finished normally. Terminal leaf.
    Success(T),

    /// The computation finished with a domain error. Terminal leaf.
    Failure(E),

    /// A timer was requested.
    ///
    /// A sleep produces no answer of its own, so `next` is pre-composed:
    /// it starts life as a trivial success and accumulates whatever was
    /// chained after the sleep. "Firing" the timer means stepping into
    /// `next`.
    Sleep {
        /// How long the program asked to wait. Never actually waited on.
        delay: Duration,
        /// The task to resume once the harness fires the timer.
        next: Box<Task<T, E>>,
    },

    /// A network call was requested.
    ///
    /// The harness supplies a synthetic response [`Value`]; `on_response`
    /// turns it into the next node.
    Http {
        /// The intercepted request, reduced to the simulated fields.
        options: RequestOptions,
        /// Continuation fed with the harness-chosen response.
        on_response: Resume<T, E>,
    },

    /// A concurrent process was requested.
    ///
    /// The child's effect tree is retained so a harness can inspect what the
    /// spawned task *would* do, but its outcome is unobservable: both of its
    /// terminal branches are routed into [`Task::Never`]. `next` carries the
    /// spawning program forward and starts as `Success(placeholder handle)`.
    Spawned {
        /// The spawned task's own effect tree. Resolving it fully always
        /// terminates at [`Task::Never`].
        child: Box<Task<Value, Value>>,
        /// The task resuming the parent computation.
        next: Box<Task<T, E>>,
    },

    /// A generic, harness-defined simulated operation.
    Mock {
        /// Harness-interpreted description of the mocked operation.
        payload: Value,
        /// Continuation fed with the harness-chosen result.
        resume: Resume<T, E>,
    },

    /// A computation that is permanently pending and will never resolve.
    ///
    /// Models deliberately abandoned continuations, such as a spawned task's
    /// discarded outcome. Carries no payload and has no valid transition, so
    /// it counts as a terminal leaf for a harness draining a tree.
    Never,
}

impl<T, E> Task<T, E> {
    /// Returns the tag of this node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasklab::task::{Task, TaskKind};
    ///
    /// let node: Task<(), String> = Task::Never;
    /// assert_eq!(node.kind(), TaskKind::Never);
    /// ```
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Success(_) => TaskKind::Success,
            Self::Failure(_) => TaskKind::Failure,
            Self::Sleep { .. } => TaskKind::Sleep,
            Self::Http { .. } => TaskKind::Http,
            Self::Spawned { .. } => TaskKind::Spawned,
            Self::Mock { .. } => TaskKind::Mock,
            Self::Never => TaskKind::Never,
        }
    }

    /// Whether this node is a pending effect a harness can still advance.
    ///
    /// `true` for `Sleep`, `Http`, `Spawned`, and `Mock`. `Success`,
    /// `Failure`, and `Never` have no transitions left.
    pub const fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::Sleep { .. } | Self::Http { .. } | Self::Spawned { .. } | Self::Mock { .. }
        )
    }

    /// The success value, if this node is a `Success` leaf.
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The domain error, if this node is a `Failure` leaf.
    pub const fn failure(&self) -> Option<&E> {
        match self {
            Self::Failure(error) => Some(error),
            _ => None,
        }
    }
}

impl<T: 'static, E: 'static> Task<T, E> {
    /// Creates a pending mock node for a harness-defined operation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use tasklab::task::{Task, TaskKind, Value};
    ///
    /// let node: Task<i32, String> = Task::mock(Rc::new("fetch-user"), |input: Value| {
    ///     match input.downcast_ref::<i32>() {
    ///         Some(id) => Task::Success(*id),
    ///         None => Task::Failure("expected an i32".to_string()),
    ///     }
    /// });
    /// assert_eq!(node.kind(), TaskKind::Mock);
    /// ```
    pub fn mock<F>(payload: Value, resume: F) -> Self
    where
        F: Fn(Value) -> Self + 'static,
    {
        Self::Mock {
            payload,
            resume: Rc::new(resume),
        }
    }
}

impl<T: Clone, E: Clone> Clone for Task<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Success(value) => Self::Success(value.clone()),
            Self::Failure(error) => Self::Failure(error.clone()),
            Self::Sleep { delay, next } => Self::Sleep {
                delay: *delay,
                next: next.clone(),
            },
            Self::Http {
                options,
                on_response,
            } => Self::Http {
                options: options.clone(),
                on_response: Rc::clone(on_response),
            },
            Self::Spawned { child, next } => Self::Spawned {
                child: child.clone(),
                next: next.clone(),
            },
            Self::Mock { payload, resume } => Self::Mock {
                payload: Rc::clone(payload),
                resume: Rc::clone(resume),
            },
            Self::Never => Self::Never,
        }
    }
}

impl<T: Debug, E: Debug> Debug for Task<T, E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => formatter.debug_tuple("Success").field(value).finish(),
            Self::Failure(error) => formatter.debug_tuple("Failure").field(error).finish(),
            Self::Sleep { delay, next } => formatter
                .debug_struct("Sleep")
                .field("delay", delay)
                .field("next", next)
                .finish(),
            Self::Http { options, .. } => formatter
                .debug_struct("Http")
                .field("options", options)
                .field("on_response", &"<continuation>")
                .finish(),
            Self::Spawned { child, next } => formatter
                .debug_struct("Spawned")
                .field("child", &child.kind())
                .field("next", next)
                .finish(),
            Self::Mock { .. } => formatter
                .debug_struct("Mock")
                .field("payload", &"<value>")
                .field("resume", &"<continuation>")
                .finish(),
            Self::Never => formatter.write_str("Never"),
        }
    }
}

// =============================================================================
// Node Tags
// =============================================================================

/// The tag of a [`Task`] node.
///
/// Harness assertions compare tags (and payload fields read off the node)
/// rather than whole nodes, since continuations have no equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// [`Task::Success`].
    Success,
    /// [`Task::Failure`].
    Failure,
    /// [`Task::Sleep`].
    Sleep,
    /// [`Task::Http`].
    Http,
    /// [`Task::Spawned`].
    Spawned,
    /// [`Task::Mock`].
    Mock,
    /// [`Task::Never`].
    Never,
}

impl Display for TaskKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Sleep => "Sleep",
            Self::Http => "Http",
            Self::Spawned => "Spawned",
            Self::Mock => "Mock",
            Self::Never => "Never",
        };
        formatter.write_str(name)
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

/// The simulated portion of an intercepted network request.
///
/// This is the payload stored in a [`Task::Http`] node and the shape a
/// harness asserts against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestOptions {
    /// HTTP method, e.g. `"GET"`.
    pub method: String,
    /// Request URL.
    pub url: String,
}

impl RequestOptions {
    /// Creates request options from a method and a URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }
}

impl Display for RequestOptions {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.method, self.url)
    }
}

/// A full network request as issued by the program under test.
///
/// Only `method` and `url` participate in the simulation; the remaining
/// fields are accepted so request-building code keeps compiling, but they
/// are not yet simulated and are dropped when the request is reduced to
/// [`RequestOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method, e.g. `"GET"`.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers. Not yet simulated.
    pub headers: Vec<(String, String)>,
    /// Request body. Not yet simulated.
    pub body: Option<String>,
    /// Whether to send credentials. Not yet simulated.
    pub with_credentials: bool,
    /// Request timeout. Not yet simulated.
    pub timeout: Option<Duration>,
}

impl Request {
    /// Creates a request with the given method and URL and no extras.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
            with_credentials: false,
            timeout: None,
        }
    }

    /// Reduces the request to the fields the simulation retains.
    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            method: self.method.clone(),
            url: self.url.clone(),
        }
    }
}

// =============================================================================
// Process Handles
// =============================================================================

/// Handle of a simulated spawned process.
///
/// Spawn interception always hands out [`ProcessId::PLACEHOLDER`]; the value
/// is kept for shape compatibility with the resumed computation but is not
/// reliable for identifying a particular spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub i32);

impl ProcessId {
    /// The placeholder handle produced by every intercepted spawn.
    pub const PLACEHOLDER: Self = Self(-1);
}

impl Display for ProcessId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "ProcessId({})", self.0)
    }
}

// Payload types must stay comparable: harness assertions work on tags and
// payload fields, never on whole nodes.
assert_impl_all!(TaskKind: Copy, PartialEq, Eq, Debug);
assert_impl_all!(RequestOptions: Clone, PartialEq, Eq, std::hash::Hash, Debug);
assert_impl_all!(ProcessId: Copy, PartialEq, Eq, Debug);
