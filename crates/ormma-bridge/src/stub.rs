// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transports for builds and tests that have no WebView host.
//
// `StubTransport` refuses every address with `TransportUnavailable`.
// `RecordingTransport` accepts everything and keeps it for inspection.

use ormma_core::error::{OrmmaError, Result};

use crate::traits::HostTransport;

/// Transport returned when no native host is attached.
#[derive(Debug, Default)]
pub struct StubTransport;

impl HostTransport for StubTransport {
    fn send(&mut self, address: &str) -> Result<()> {
        tracing::warn!(address, "HostTransport::send called on stub transport");
        Err(OrmmaError::TransportUnavailable)
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(message, "HostTransport::alert called on stub transport");
    }
}

/// In-memory host that records every address and alert it receives.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Vec<String>,
    alerts: Vec<String>,
    reject_sends: bool,
    reject_remaining: usize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every `send` fails, for exercising error paths.
    pub fn rejecting() -> Self {
        Self {
            reject_sends: true,
            ..Self::default()
        }
    }

    /// Addresses delivered so far, oldest first.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.sent.last().map(String::as_str)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn set_rejecting(&mut self, reject: bool) {
        self.reject_sends = reject;
    }

    /// Refuse only the next `count` sends.
    pub fn reject_next(&mut self, count: usize) {
        self.reject_remaining = count;
    }
}

impl HostTransport for RecordingTransport {
    fn send(&mut self, address: &str) -> Result<()> {
        if self.reject_remaining > 0 {
            self.reject_remaining -= 1;
            return Err(OrmmaError::Transport(format!("host rejected {address}")));
        }
        if self.reject_sends {
            return Err(OrmmaError::Transport(format!("host rejected {address}")));
        }
        self.sent.push(address.to_string());
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
