// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic seam between the bridge and the native host.
//
// On a device the host intercepts navigation to `ormma://…` addresses inside
// the WebView. Here that interception is abstracted as a transport so the
// dispatch and queueing logic can run without a real host.

use ormma_core::error::Result;

/// Outbound channel to the native host.
pub trait HostTransport {
    /// Hand one encoded address to the host.
    ///
    /// Fire-and-forget: the host signals completion later through
    /// `Bridge::native_call_complete`. Returns an error only when the
    /// address could not be delivered at all.
    fn send(&mut self, address: &str) -> Result<()>;

    /// Show a blocking, user-visible alert.
    ///
    /// Used for diagnostics that have no recoverable error channel.
    fn alert(&mut self, message: &str);
}

impl<T: HostTransport + ?Sized> HostTransport for Box<T> {
    fn send(&mut self, address: &str) -> Result<()> {
        (**self).send(address)
    }

    fn alert(&mut self, message: &str) {
        (**self).alert(message)
    }
}
