// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The bridge session: command dispatch, completion handling and host event
// fan-out. One `Bridge` lives for one page session and owns all state that
// creative code and the host share.

use ormma_core::config::BridgeConfig;
use ormma_core::error::Result;
use ormma_core::types::{
    BridgeEvent, EventKind, ExpandProperties, HOST_ACK, HostCall, ShakeProperties,
};
use tracing::{debug, error, info, instrument};

use crate::address::NativeAddress;
use crate::listeners::{DeferredCalls, Listener, ListenerRegistry};
use crate::queue::CallQueue;
use crate::traits::HostTransport;

/// Creative-facing and host-facing bridge over a [`HostTransport`].
#[derive(Debug)]
pub struct Bridge<T: HostTransport> {
    pub(crate) config: BridgeConfig,
    pub(crate) transport: T,
    pub(crate) queue: CallQueue,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) expand_properties: ExpandProperties,
    pub(crate) shake_properties: ShakeProperties,
}

impl<T: HostTransport> Bridge<T> {
    /// Start a session with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::from_parts(BridgeConfig::default(), transport)
    }

    /// Start a session with an explicit configuration.
    pub fn with_config(config: BridgeConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, transport))
    }

    fn from_parts(config: BridgeConfig, transport: T) -> Self {
        info!(scheme = %config.scheme, "bridge session started");
        Self {
            config,
            transport,
            queue: CallQueue::new(),
            listeners: ListenerRegistry::new(),
            expand_properties: ExpandProperties::default(),
            shake_properties: ShakeProperties::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Whether a call is outstanding with the host.
    pub fn is_in_flight(&self) -> bool {
        self.queue.is_in_flight()
    }

    /// Addresses waiting behind the in-flight call, in submission order.
    pub fn queued_calls(&self) -> &[String] {
        self.queue.pending()
    }

    // -----------------------------------------------------------------------
    // Listener registration
    // -----------------------------------------------------------------------

    pub fn add_event_listener(&mut self, kind: EventKind, handler: Listener) {
        if !self.listeners.add(kind, handler) {
            debug!(event = %kind, "listener already registered");
        }
    }

    pub fn remove_event_listener(&mut self, kind: EventKind, handler: &Listener) {
        if !self.listeners.remove(kind, handler) {
            debug!(event = %kind, "listener was not registered");
        }
    }

    pub fn listeners(&self, kind: EventKind) -> &[Listener] {
        self.listeners.listeners(kind)
    }

    // -----------------------------------------------------------------------
    // Outbound dispatch
    // -----------------------------------------------------------------------

    /// Encode `command` with its key/value pairs and dispatch it, or queue
    /// it if a call is already in flight. Pairs with a `None` value are
    /// dropped.
    pub fn execute_native_call(
        &mut self,
        command: &str,
        pairs: &[(&str, Option<&str>)],
    ) -> Result<()> {
        let mut address = self.address(command);
        for (key, value) in pairs {
            address.push(key, *value);
        }
        self.dispatch(address)
    }

    pub(crate) fn address(&self, command: &str) -> NativeAddress {
        NativeAddress::new(&self.config.scheme, command)
    }

    #[instrument(skip_all, fields(address = %address))]
    pub(crate) fn dispatch(&mut self, address: NativeAddress) -> Result<()> {
        let Some(address) = self.queue.submit(address.into_string()) else {
            return Ok(());
        };

        if let Err(e) = self.transport.send(&address) {
            error!(error = %e, "native call could not be delivered");
            self.queue.abandon_in_flight();
            return Err(e);
        }

        debug!("native call dispatched");
        Ok(())
    }

    /// Host signal that the outstanding call finished. Sends the most
    /// recently queued call, if any.
    ///
    /// A queued call the transport refuses is dropped and the next one is
    /// tried, so the in-flight flag is only cleared once the queue is empty.
    #[instrument(skip(self))]
    pub fn native_call_complete(&mut self, token: Option<&str>) -> &'static str {
        while let Some(next) = self.queue.complete() {
            match self.transport.send(&next) {
                Ok(()) => {
                    debug!(
                        address = %next,
                        remaining = self.queue.len(),
                        "queued native call dispatched"
                    );
                    return HOST_ACK;
                }
                Err(e) => error!(
                    error = %e,
                    address = %next,
                    "queued native call could not be delivered, dropped"
                ),
            }
        }
        debug!("native call queue drained");
        HOST_ACK
    }

    // -----------------------------------------------------------------------
    // Host entry points
    // -----------------------------------------------------------------------

    pub fn fire_asset_ready_event(&mut self, alias: &str, url: &str) -> &'static str {
        self.fire(BridgeEvent::AssetReady {
            alias: alias.to_string(),
            url: url.to_string(),
        })
    }

    pub fn fire_asset_removed_event(&mut self, alias: &str) -> &'static str {
        self.fire(BridgeEvent::AssetRemoved {
            alias: alias.to_string(),
        })
    }

    pub fn fire_asset_retired_event(&mut self, alias: &str) -> &'static str {
        self.fire(BridgeEvent::AssetRetired {
            alias: alias.to_string(),
        })
    }

    pub fn fire_change_event(&mut self, properties: serde_json::Value) -> &'static str {
        self.fire(BridgeEvent::Change { properties })
    }

    pub fn fire_error_event(&mut self, message: &str, action: &str) -> &'static str {
        self.fire(BridgeEvent::Error {
            message: message.to_string(),
            action: action.to_string(),
        })
    }

    pub fn fire_shake_event(&mut self) -> &'static str {
        self.fire(BridgeEvent::Shake)
    }

    /// Forward a host message to the blocking alert.
    pub fn show_alert(&mut self, message: &str) -> &'static str {
        self.transport.alert(message);
        HOST_ACK
    }

    /// Route a decoded host invocation to its entry point.
    pub fn handle_host_call(&mut self, call: HostCall) -> &'static str {
        match call {
            HostCall::AssetReady { alias, url } => self.fire_asset_ready_event(&alias, &url),
            HostCall::AssetRemoved { alias } => self.fire_asset_removed_event(&alias),
            HostCall::AssetRetired { alias } => self.fire_asset_retired_event(&alias),
            HostCall::Change { properties } => self.fire_change_event(properties),
            HostCall::Error { message, action } => self.fire_error_event(&message, &action),
            HostCall::Shake => self.fire_shake_event(),
            HostCall::CallComplete { token } => self.native_call_complete(token.as_deref()),
            HostCall::ShowAlert { message } => self.show_alert(&message),
        }
    }

    /// Fan `event` out, then apply whatever page calls the listeners issued.
    fn fire(&mut self, event: BridgeEvent) -> &'static str {
        let mut deferred = DeferredCalls::new();
        self.listeners.fire(&event, self.config.isolate_listener_panics, &mut deferred);

        for call in deferred.into_calls() {
            if let Err(e) = self.apply_page_call(call) {
                error!(event = %event.kind(), error = %e, "listener call failed");
            }
        }
        HOST_ACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::listener;
    use crate::stub::{RecordingTransport, StubTransport};
    use ormma_core::error::OrmmaError;
    use ormma_core::types::PageCall;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bridge() -> Bridge<RecordingTransport> {
        Bridge::new(RecordingTransport::new())
    }

    fn collect(log: &Rc<RefCell<Vec<BridgeEvent>>>) -> Listener {
        let log = Rc::clone(log);
        listener(move |event, _| log.borrow_mut().push(event.clone()))
    }

    #[test]
    fn absent_values_produce_no_query_string() {
        let mut bridge = bridge();
        bridge
            .execute_native_call("request", &[("uri", None), ("display", None)])
            .expect("dispatch");
        assert_eq!(bridge.transport().sent(), ["ormma://request"]);
    }

    #[test]
    fn values_are_escaped_and_joined() {
        let mut bridge = bridge();
        bridge
            .execute_native_call(
                "email",
                &[("to", Some("a@b.com")), ("subject", Some("Hi there")), ("html", Some("N"))],
            )
            .expect("dispatch");
        assert_eq!(
            bridge.transport().last_sent(),
            Some("ormma://email?to=a@b.com&subject=Hi%20there&html=N")
        );
    }

    #[test]
    fn second_call_waits_for_completion() {
        let mut bridge = bridge();
        bridge.execute_native_call("show", &[]).expect("A");
        bridge.execute_native_call("hide", &[]).expect("B");

        assert_eq!(bridge.transport().sent(), ["ormma://show"]);
        assert_eq!(bridge.queued_calls(), ["ormma://hide"]);
        assert!(bridge.is_in_flight());

        assert_eq!(bridge.native_call_complete(None), "OK");
        assert_eq!(bridge.transport().sent(), ["ormma://show", "ormma://hide"]);
        assert!(bridge.is_in_flight());

        bridge.native_call_complete(None);
        assert!(!bridge.is_in_flight());
    }

    #[test]
    fn queued_calls_drain_last_in_first_out() {
        let mut bridge = bridge();
        bridge.execute_native_call("show", &[]).expect("A");
        bridge.execute_native_call("hide", &[]).expect("B");
        bridge.execute_native_call("close", &[]).expect("C");

        bridge.native_call_complete(None);
        bridge.native_call_complete(None);
        bridge.native_call_complete(None);

        assert_eq!(
            bridge.transport().sent(),
            ["ormma://show", "ormma://close", "ormma://hide"]
        );
        assert!(!bridge.is_in_flight());
    }

    #[test]
    fn call_after_drain_is_sent_immediately() {
        let mut bridge = bridge();
        bridge.execute_native_call("show", &[]).expect("A");
        bridge.native_call_complete(Some("show"));
        bridge.execute_native_call("hide", &[]).expect("B");
        assert_eq!(bridge.transport().sent(), ["ormma://show", "ormma://hide"]);
    }

    #[test]
    fn failed_immediate_send_clears_in_flight() {
        let mut bridge = Bridge::new(StubTransport);
        let result = bridge.execute_native_call("show", &[]);
        assert!(matches!(result, Err(OrmmaError::TransportUnavailable)));
        assert!(!bridge.is_in_flight());
    }

    #[test]
    fn refused_queued_call_falls_through_to_the_next_one() {
        let mut bridge = bridge();
        bridge.execute_native_call("show", &[]).expect("A");
        bridge.execute_native_call("hide", &[]).expect("B");
        bridge.execute_native_call("close", &[]).expect("C");

        bridge.transport_mut().reject_next(1);
        assert_eq!(bridge.native_call_complete(None), "OK");

        assert_eq!(bridge.transport().sent(), ["ormma://show", "ormma://hide"]);
        assert!(bridge.is_in_flight());
        assert!(bridge.queued_calls().is_empty());

        bridge.execute_native_call("resize", &[]).expect("D");
        assert_eq!(bridge.transport().sent().len(), 2);
        assert_eq!(bridge.queued_calls(), ["ormma://resize"]);

        bridge.native_call_complete(None);
        assert_eq!(bridge.transport().last_sent(), Some("ormma://resize"));
        bridge.native_call_complete(None);
        assert!(!bridge.is_in_flight());
    }

    #[test]
    fn failed_queued_send_still_acknowledges() {
        let mut bridge = bridge();
        bridge.execute_native_call("show", &[]).expect("A");
        bridge.execute_native_call("hide", &[]).expect("B");
        bridge.transport_mut().set_rejecting(true);

        assert_eq!(bridge.native_call_complete(None), "OK");
        assert!(!bridge.is_in_flight());
        assert!(bridge.queued_calls().is_empty());
    }

    #[test]
    fn custom_scheme_is_used() {
        let config = BridgeConfig {
            scheme: "mraid".into(),
            ..BridgeConfig::default()
        };
        let mut bridge = Bridge::with_config(config, RecordingTransport::new()).expect("bridge");
        bridge.execute_native_call("close", &[]).expect("dispatch");
        assert_eq!(bridge.transport().sent(), ["mraid://close"]);
    }

    #[test]
    fn invalid_scheme_is_rejected() {
        let config = BridgeConfig {
            scheme: "not a scheme".into(),
            ..BridgeConfig::default()
        };
        assert!(Bridge::with_config(config, RecordingTransport::new()).is_err());
    }

    #[test]
    fn host_events_reach_listeners_with_arguments() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = bridge();
        bridge.add_event_listener(EventKind::AssetReady, collect(&log));
        bridge.add_event_listener(EventKind::Error, collect(&log));

        assert_eq!(bridge.fire_asset_ready_event("logo", "file:///cache/logo.png"), "OK");
        assert_eq!(bridge.fire_error_event("cache full", "addasset"), "OK");
        assert_eq!(bridge.fire_shake_event(), "OK");

        assert_eq!(
            *log.borrow(),
            [
                BridgeEvent::AssetReady {
                    alias: "logo".into(),
                    url: "file:///cache/logo.png".into(),
                },
                BridgeEvent::Error {
                    message: "cache full".into(),
                    action: "addasset".into(),
                },
            ]
        );
    }

    #[test]
    fn duplicate_registration_fires_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let handler = collect(&log);
        let mut bridge = bridge();
        bridge.add_event_listener(EventKind::Shake, Rc::clone(&handler));
        bridge.add_event_listener(EventKind::Shake, Rc::clone(&handler));

        bridge.fire_shake_event();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn removing_never_added_handler_is_harmless() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = bridge();
        bridge.remove_event_listener(EventKind::AssetRetired, &collect(&log));
        assert!(bridge.listeners(EventKind::AssetRetired).is_empty());
    }

    #[test]
    fn listener_can_issue_a_native_call() {
        let mut bridge = bridge();
        bridge.add_event_listener(
            EventKind::AssetReady,
            listener(|_, calls| calls.push(PageCall::Show)),
        );

        assert_eq!(bridge.fire_asset_ready_event("logo", "file:///logo.png"), "OK");
        assert_eq!(bridge.transport().sent(), ["ormma://show"]);
        assert!(bridge.is_in_flight());
    }

    #[test]
    fn listener_calls_queue_behind_the_in_flight_call() {
        let mut bridge = bridge();
        bridge.add_event_listener(
            EventKind::Shake,
            listener(|_, calls| {
                calls.push(PageCall::Hide);
                calls.push(PageCall::Close);
            }),
        );
        bridge.execute_native_call("show", &[]).expect("dispatch");

        assert_eq!(bridge.fire_shake_event(), "OK");
        assert_eq!(bridge.transport().sent(), ["ormma://show"]);
        assert_eq!(bridge.queued_calls(), ["ormma://hide", "ormma://close"]);
    }

    #[test]
    fn failing_listener_call_still_acknowledges() {
        let mut bridge = Bridge::new(StubTransport);
        bridge.add_event_listener(EventKind::Change, listener(|_, calls| calls.push(PageCall::Show)));

        assert_eq!(bridge.fire_change_event(serde_json::json!({})), "OK");
        assert!(!bridge.is_in_flight());
    }

    #[test]
    fn host_calls_are_routed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = bridge();
        bridge.add_event_listener(EventKind::Change, collect(&log));
        bridge.execute_native_call("show", &[]).expect("dispatch");

        let change = HostCall::Change {
            properties: serde_json::json!({ "state": "expanded" }),
        };
        assert_eq!(bridge.handle_host_call(change), "OK");
        assert_eq!(
            bridge.handle_host_call(HostCall::ShowAlert { message: "hi".into() }),
            "OK"
        );
        assert_eq!(
            bridge.handle_host_call(HostCall::CallComplete { token: None }),
            "OK"
        );

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(bridge.transport().alerts(), ["hi"]);
        assert!(!bridge.is_in_flight());
    }
}
