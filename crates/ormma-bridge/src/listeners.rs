// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Listener registry for host-pushed events.
//
// Listeners run while the bridge is mid-dispatch, so they cannot call back
// into it directly. Calls they want to make are pushed onto a
// `DeferredCalls` sink and applied by the bridge once fan-out is over.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use ormma_core::types::{BridgeEvent, EventKind, PageCall};
use tracing::{debug, error};

/// A page callback. Identity is the `Rc` allocation, so registering a
/// clone of the same handle twice is a no-op.
pub type Listener = Rc<dyn Fn(&BridgeEvent, &mut DeferredCalls)>;

/// Wrap a closure as a [`Listener`].
pub fn listener(f: impl Fn(&BridgeEvent, &mut DeferredCalls) + 'static) -> Listener {
    Rc::new(f)
}

/// Page calls issued by listeners during one fan-out, in issue order.
#[derive(Debug, Default)]
pub struct DeferredCalls {
    calls: Vec<PageCall>,
}

impl DeferredCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: PageCall) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn into_calls(self) -> Vec<PageCall> {
        self.calls
    }
}

/// Per-event ordered listener lists.
#[derive(Default)]
pub struct ListenerRegistry {
    handlers: HashMap<EventKind, Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `kind` unless it is already there.
    ///
    /// Returns `true` if the handler was added.
    pub fn add(&mut self, kind: EventKind, handler: Listener) -> bool {
        let handlers = self.handlers.entry(kind).or_default();
        if handlers.iter().any(|existing| Rc::ptr_eq(existing, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove `handler` from the list for `kind`.
    ///
    /// Returns `true` if something was removed.
    pub fn remove(&mut self, kind: EventKind, handler: &Listener) -> bool {
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return false;
        };
        match handlers.iter().position(|existing| Rc::ptr_eq(existing, handler)) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Listeners for `kind`, in registration order.
    pub fn listeners(&self, kind: EventKind) -> &[Listener] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Invoke every listener registered for the event's kind, in order.
    ///
    /// Calls the listeners issue land in `deferred`. With `isolate_panics`,
    /// a panicking listener is logged and the rest still run; whatever it
    /// pushed before panicking is kept. Returns how many listeners completed
    /// normally.
    pub fn fire(
        &self,
        event: &BridgeEvent,
        isolate_panics: bool,
        deferred: &mut DeferredCalls,
    ) -> usize {
        let kind = event.kind();
        let mut completed = 0;

        for (index, handler) in self.listeners(kind).iter().enumerate() {
            if isolate_panics {
                match catch_unwind(AssertUnwindSafe(|| handler(event, &mut *deferred))) {
                    Ok(()) => completed += 1,
                    Err(_) => error!(event = %kind, index, "listener panicked"),
                }
            } else {
                handler(event, deferred);
                completed += 1;
            }
        }

        debug!(event = %kind, completed, deferred = deferred.len(), "event fanned out");
        completed
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<EventKind, usize> =
            self.handlers.iter().map(|(kind, list)| (*kind, list.len())).collect();
        f.debug_struct("ListenerRegistry").field("handlers", &counts).finish()
    }
}
