// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ORMMA bridge — lets creative code drive native capabilities through
// host-intercepted `ormma://` addresses, one call in flight at a time, and
// fans host-pushed events back out to page listeners.
//
// The transport to the host is injected (`HostTransport`), so everything
// here runs identically inside a WebView shell, a test, or the replay tool.

pub mod address;
pub mod bridge;
pub mod capabilities;
pub mod listeners;
pub mod queue;
pub mod stub;
pub mod traits;

pub use address::NativeAddress;
pub use bridge::Bridge;
pub use capabilities::{NavigationFlags, calendar_timestamp};
pub use listeners::{DeferredCalls, Listener, ListenerRegistry, listener};
pub use queue::CallQueue;
pub use stub::{RecordingTransport, StubTransport};
pub use traits::HostTransport;
