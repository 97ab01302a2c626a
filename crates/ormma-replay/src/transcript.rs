// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replay transcript and the transport that writes into it.

use std::cell::RefCell;
use std::rc::Rc;

use ormma_bridge::HostTransport;
use ormma_core::error::Result;

/// Shared, append-only log of everything the replay observed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
    echo: bool,
}

impl Transcript {
    /// A transcript that also prints each line to stdout as it arrives.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn record(&self, line: String) {
        if self.echo {
            println!("{line}");
        }
        self.lines.borrow_mut().push(line);
    }

    #[cfg(test)]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

/// Host stand-in: every address and alert lands in the transcript.
#[derive(Debug)]
pub struct TranscriptTransport {
    transcript: Transcript,
}

impl TranscriptTransport {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

impl HostTransport for TranscriptTransport {
    fn send(&mut self, address: &str) -> Result<()> {
        self.transcript.record(format!("-> {address}"));
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.transcript.record(format!("!! {message}"));
    }
}
