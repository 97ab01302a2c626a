// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replay scripts: a JSON array of page calls and host invocations, run in
// order against one bridge session.

use std::path::Path;

use ormma_bridge::{Bridge, listener};
use ormma_core::config::BridgeConfig;
use ormma_core::error::Result;
use ormma_core::types::{EventKind, HostCall, PageCall};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::transcript::{Transcript, TranscriptTransport};

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Something creative code does.
    Page(PageCall),
    /// Something the native host does.
    Host(HostCall),
}

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Step>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&raw)?)
}

/// Run `steps` through a fresh bridge, recording into `transcript`.
///
/// Every event kind gets a listener that writes the event payload as JSON.
/// A page call that fails is logged and recorded; the replay continues.
pub fn run(steps: Vec<Step>, config: BridgeConfig, transcript: &Transcript) -> Result<()> {
    let mut bridge = Bridge::with_config(config, TranscriptTransport::new(transcript.clone()))?;

    for kind in EventKind::ALL {
        let sink = transcript.clone();
        bridge.add_event_listener(
            kind,
            listener(move |event, _| {
                let payload = serde_json::to_string(event).unwrap_or_else(|e| e.to_string());
                sink.record(format!("<- {kind} {payload}"));
            }),
        );
    }

    let total = steps.len();
    for (index, step) in steps.into_iter().enumerate() {
        match step {
            Step::Page(call) => {
                if let Err(e) = bridge.apply_page_call(call) {
                    warn!(step = index, error = %e, "page call failed");
                    transcript.record(format!("xx {e}"));
                }
            }
            Step::Host(call) => {
                let ack = bridge.handle_host_call(call);
                transcript.record(format!("   {ack}"));
            }
        }
    }

    info!(
        steps = total,
        in_flight = bridge.is_in_flight(),
        queued = bridge.queued_calls().len(),
        "replay finished"
    );
    Ok(())
}
