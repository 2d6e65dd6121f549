//! Effect interception shims.
//!
//! Three constructors that stand in for the host's real primitives: instead
//! of waiting, forking, or touching the network, each returns an effect node
//! describing the request. Programs wired against these shims build
//! inspectable trees a harness drives with synthetic values.
//!
//! At this boundary the trees are type-erased ([`TaskValue`]): the harness
//! chooses the concrete types of synthetic inputs and downcasts payloads
//! back out, the same way the typed algebra erases continuation inputs.

use std::rc::Rc;
use std::time::Duration;

use super::node::{ProcessId, Request, Task, Value};
use super::platform::PlatformTask;

/// A type-erased effect node, as produced by the interception shims.
pub type TaskValue = Task<Value, Value>;

/// A type-erased platform task, as consumed by the interception shims.
pub type PlatformValue = PlatformTask<Value, Value>;

/// Strategy for decoding a synthetic network response.
///
/// Applied by an intercepted request's continuation: `Ok` becomes
/// [`Task::Success`], `Err` becomes [`Task::Failure`]. Supplied at harness
/// configuration time; see [`send`].
pub type ResponseDecoder = Rc<dyn Fn(Value) -> Result<Value, Value>>;

/// The unit value a fired sleep resolves to.
#[must_use]
pub fn unit() -> Value {
    Rc::new(())
}

/// Intercepts the delay primitive.
///
/// No waiting occurs: the returned node records the requested duration, and
/// firing the timer just steps into a trivial success.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tasklab::task::{intercept, Task, TaskKind};
///
/// let node = intercept::sleep(Duration::from_millis(500));
/// let Task::Sleep { delay, next } = node else { panic!("expected Sleep") };
/// assert_eq!(delay, Duration::from_millis(500));
/// assert_eq!(next.kind(), TaskKind::Success);
/// ```
#[must_use]
pub fn sleep(delay: Duration) -> TaskValue {
    Task::Sleep {
        delay,
        next: Box::new(Task::Success(unit())),
    }
}

/// Intercepts the spawn primitive.
///
/// The spawned task's outcome is made unobservable: both its success and its
/// failure are routed into [`Task::Never`], modeling fire-and-forget
/// semantics. The child tree itself is retained so a harness can inspect the
/// effects the spawned task would request. The resumed computation receives
/// [`ProcessId::PLACEHOLDER`]; the handle is not reliable for identifying a
/// particular spawn.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use tasklab::task::{intercept, PlatformTask, Task, TaskKind, Value};
///
/// let node = intercept::spawn(PlatformTask::succeed(Rc::new(42_i32) as Value));
/// let Task::Spawned { child, next } = node else { panic!("expected Spawned") };
/// // The child's outcome is discarded, whatever it was.
/// assert_eq!(child.kind(), TaskKind::Never);
/// assert_eq!(next.kind(), TaskKind::Success);
/// ```
#[must_use]
pub fn spawn(task: PlatformValue) -> TaskValue {
    let child = task
        .normalize()
        .and_then(|_| PlatformTask::Task(Task::Never))
        .on_error(|_| PlatformTask::Task(Task::Never));
    Task::Spawned {
        child: Box::new(child),
        next: Box::new(Task::Success(Rc::new(ProcessId::PLACEHOLDER) as Value)),
    }
}

/// Intercepts the network-request primitive with a decoding strategy.
///
/// Only the request's method and URL participate in the simulation; headers,
/// body, credentials, and timeout are not yet simulated. The harness later
/// supplies a synthetic response, which `decoder` turns into the success or
/// failure the program observes.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use tasklab::task::{intercept, Request, Task, Value};
///
/// let decoder: tasklab::task::ResponseDecoder = Rc::new(|response: Value| {
///     response
///         .downcast_ref::<&str>()
///         .map(|body| Rc::new(body.len()) as Value)
///         .ok_or_else(|| Rc::new("unexpected response shape") as Value)
/// });
///
/// let node = intercept::send(&Request::new("GET", "/x"), decoder);
/// let Task::Http { on_response, .. } = node else { panic!("expected Http") };
/// let resolved = on_response(Rc::new("hello"));
/// let length = resolved.success().unwrap().downcast_ref::<usize>().copied();
/// assert_eq!(length, Some(5));
/// ```
#[must_use]
pub fn send(request: &Request, decoder: ResponseDecoder) -> TaskValue {
    Task::Http {
        options: request.options(),
        on_response: Rc::new(move |response| match decoder(response) {
            Ok(value) => Task::Success(value),
            Err(error) => Task::Failure(error),
        }),
    }
}

/// Intercepts the network-request primitive without a decoding strategy.
///
/// The node can still be inspected and composed, but resolving it is a setup
/// defect.
///
/// # Panics
///
/// The stored continuation panics when invoked, naming the request, because
/// no decoder was configured to interpret the synthetic response. Supply one
/// through [`send`] (or `EffectRegistry::simulated_with_decoder`) instead.
#[must_use]
pub fn send_undecoded(request: &Request) -> TaskValue {
    let options = request.options();
    let described = options.clone();
    Task::Http {
        options,
        on_response: Rc::new(move |_| {
            panic!(
                "no response decoder configured for '{described}': supply a decoding \
                 strategy before resolving intercepted requests"
            )
        }),
    }
}
