//! Registration boundary for the interception shims.
//!
//! Rather than swapping effect primitives behind the program's back through
//! global bindings, the wiring is an explicit value: an [`EffectRegistry`]
//! holds the three named slots
//! — `sleep`, `spawn`, `send` — and is handed to whatever assembles the
//! program under test. A registry cannot be constructed with a slot missing;
//! [`EffectRegistryBuilder::build`] fails immediately, naming the first
//! unbound slot.

use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;
use std::time::Duration;

use super::intercept::{self, PlatformValue, ResponseDecoder, TaskValue};
use super::node::Request;

// =============================================================================
// Slot Signatures
// =============================================================================

/// The delay slot: duration in, effect node out.
pub type SleepSlot = Rc<dyn Fn(Duration) -> TaskValue>;

/// The spawn slot: platform task in, effect node out.
pub type SpawnSlot = Rc<dyn Fn(PlatformValue) -> TaskValue>;

/// The network-request slot: request in, effect node out.
pub type SendSlot = Rc<dyn Fn(Request) -> TaskValue>;

// =============================================================================
// Missing Slot Error
// =============================================================================

/// A registry was built with one of its three slots unbound.
///
/// This is a setup defect surfaced at construction time, before any program
/// code runs, so there is no window where a primitive silently falls back to
/// its real implementation.
///
/// # Examples
///
/// ```rust
/// use tasklab::task::{EffectRegistry, MissingSlotError};
///
/// let result = EffectRegistry::builder().build();
/// assert_eq!(result.unwrap_err(), MissingSlotError { slot: "sleep" });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSlotError {
    /// The name of the unbound slot (`"sleep"`, `"spawn"`, or `"send"`).
    pub slot: &'static str,
}

impl Display for MissingSlotError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "effect slot '{}' is not bound: bind all of sleep, spawn, and send \
             before building the registry",
            self.slot
        )
    }
}

impl std::error::Error for MissingSlotError {}

// =============================================================================
// Effect Registry
// =============================================================================

/// The dependency-injection surface exposing the intercepted primitives.
///
/// A program under test receives a registry (instead of reaching for real
/// timers, processes, or sockets) and calls [`EffectRegistry::sleep`],
/// [`EffectRegistry::spawn`], and [`EffectRegistry::send`] to request
/// effects. All three slots are bound at construction time.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tasklab::task::{EffectRegistry, TaskKind};
///
/// let effects = EffectRegistry::simulated();
/// let node = effects.sleep(Duration::from_millis(5));
/// assert_eq!(node.kind(), TaskKind::Sleep);
/// ```
pub struct EffectRegistry {
    sleep: SleepSlot,
    spawn: SpawnSlot,
    send: SendSlot,
}

impl EffectRegistry {
    /// A registry with all three slots bound to the interception shims.
    ///
    /// Network requests carry the undecoded placeholder continuation; use
    /// [`EffectRegistry::simulated_with_decoder`] when the harness needs to
    /// resolve responses.
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            sleep: Rc::new(intercept::sleep),
            spawn: Rc::new(intercept::spawn),
            send: Rc::new(|request: Request| intercept::send_undecoded(&request)),
        }
    }

    /// Like [`EffectRegistry::simulated`], with a response decoding strategy
    /// for intercepted network requests.
    #[must_use]
    pub fn simulated_with_decoder(decoder: ResponseDecoder) -> Self {
        Self {
            sleep: Rc::new(intercept::sleep),
            spawn: Rc::new(intercept::spawn),
            send: Rc::new(move |request: Request| intercept::send(&request, Rc::clone(&decoder))),
        }
    }

    /// Starts building a registry with custom slot bindings.
    #[must_use]
    pub fn builder() -> EffectRegistryBuilder {
        EffectRegistryBuilder {
            sleep: None,
            spawn: None,
            send: None,
        }
    }

    /// Requests a timer through the bound delay slot.
    #[must_use]
    pub fn sleep(&self, delay: Duration) -> TaskValue {
        (self.sleep)(delay)
    }

    /// Requests a process spawn through the bound spawn slot.
    #[must_use]
    pub fn spawn(&self, task: PlatformValue) -> TaskValue {
        (self.spawn)(task)
    }

    /// Requests a network call through the bound request slot.
    #[must_use]
    pub fn send(&self, request: Request) -> TaskValue {
        (self.send)(request)
    }
}

impl Debug for EffectRegistry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EffectRegistry")
            .field("sleep", &"<slot>")
            .field("spawn", &"<slot>")
            .field("send", &"<slot>")
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder collecting the three slot bindings for an [`EffectRegistry`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tasklab::task::{intercept, EffectRegistry, TaskKind};
///
/// let effects = EffectRegistry::builder()
///     .bind_sleep(intercept::sleep)
///     .bind_spawn(intercept::spawn)
///     .bind_send(|request| intercept::send_undecoded(&request))
///     .build()
///     .expect("all slots bound");
///
/// assert_eq!(effects.sleep(Duration::from_millis(1)).kind(), TaskKind::Sleep);
/// ```
#[derive(Default)]
pub struct EffectRegistryBuilder {
    sleep: Option<SleepSlot>,
    spawn: Option<SpawnSlot>,
    send: Option<SendSlot>,
}

impl EffectRegistryBuilder {
    /// Binds the delay slot.
    #[must_use]
    pub fn bind_sleep(mut self, slot: impl Fn(Duration) -> TaskValue + 'static) -> Self {
        self.sleep = Some(Rc::new(slot));
        self
    }

    /// Binds the spawn slot.
    #[must_use]
    pub fn bind_spawn(mut self, slot: impl Fn(PlatformValue) -> TaskValue + 'static) -> Self {
        self.spawn = Some(Rc::new(slot));
        self
    }

    /// Binds the network-request slot.
    #[must_use]
    pub fn bind_send(mut self, slot: impl Fn(Request) -> TaskValue + 'static) -> Self {
        self.send = Some(Rc::new(slot));
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`MissingSlotError`] naming the first unbound slot. Checked
    /// here, at construction, so a half-wired simulation never reaches the
    /// program under test.
    pub fn build(self) -> Result<EffectRegistry, MissingSlotError> {
        let sleep = self.sleep.ok_or(MissingSlotError { slot: "sleep" })?;
        let spawn = self.spawn.ok_or(MissingSlotError { slot: "spawn" })?;
        let send = self.send.ok_or(MissingSlotError { slot: "send" })?;
        Ok(EffectRegistry { sleep, spawn, send })
    }
}

impl Debug for EffectRegistryBuilder {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EffectRegistryBuilder")
            .field("sleep", &self.sleep.as_ref().map(|_| "<slot>"))
            .field("spawn", &self.spawn.as_ref().map(|_| "<slot>"))
            .field("send", &self.send.as_ref().map(|_| "<slot>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskKind};

    #[test]
    fn test_missing_slot_error_names_the_slot() {
        let error = EffectRegistry::builder()
            .bind_sleep(intercept::sleep)
            .build()
            .unwrap_err();
        assert_eq!(error, MissingSlotError { slot: "spawn" });
        assert_eq!(
            format!("{error}"),
            "effect slot 'spawn' is not bound: bind all of sleep, spawn, and send \
             before building the registry"
        );
    }

    #[test]
    fn test_missing_slots_reported_in_declaration_order() {
        let error = EffectRegistry::builder().build().unwrap_err();
        assert_eq!(error.slot, "sleep");

        let error = EffectRegistry::builder()
            .bind_sleep(intercept::sleep)
            .bind_spawn(intercept::spawn)
            .build()
            .unwrap_err();
        assert_eq!(error.slot, "send");
    }

    #[test]
    fn test_simulated_registry_binds_all_slots() {
        let effects = EffectRegistry::simulated();
        assert_eq!(
            effects.sleep(Duration::from_millis(1)).kind(),
            TaskKind::Sleep
        );
        assert_eq!(
            effects
                .spawn(crate::task::PlatformTask::Task(Task::Never))
                .kind(),
            TaskKind::Spawned
        );
        assert_eq!(
            effects.send(Request::new("GET", "/x")).kind(),
            TaskKind::Http
        );
    }

    #[test]
    fn test_custom_slot_binding_is_used() {
        let effects = EffectRegistry::builder()
            .bind_sleep(|_| Task::Never)
            .bind_spawn(intercept::spawn)
            .bind_send(|request| intercept::send_undecoded(&request))
            .build()
            .expect("all slots bound");
        assert_eq!(
            effects.sleep(Duration::from_millis(1)).kind(),
            TaskKind::Never
        );
    }

    #[test]
    fn test_decoder_wiring_resolves_responses() {
        let decoder: ResponseDecoder = Rc::new(|response| Ok(response));
        let effects = EffectRegistry::simulated_with_decoder(decoder);

        let node = effects.send(Request::new("GET", "/x"));
        let Task::Http { on_response, .. } = node else {
            panic!("expected Http");
        };
        let resolved = on_response(Rc::new(7_i32));
        let value = resolved
            .success()
            .and_then(|value| value.downcast_ref::<i32>().copied());
        assert_eq!(value, Some(7));
    }
}
