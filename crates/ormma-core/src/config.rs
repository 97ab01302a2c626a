// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OrmmaError, Result};

/// Address scheme the native host intercepts.
pub const DEFAULT_SCHEME: &str = "ormma";

/// Settings for a single bridge session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Scheme prefix of every outbound address (`<scheme>://<command>`).
    pub scheme: String,
    /// Keep fanning out to the remaining listeners when one of them panics.
    pub isolate_listener_panics: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            isolate_listener_panics: true,
        }
    }
}

impl BridgeConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the scheme is something a host can actually intercept.
    ///
    /// Follows the RFC 3986 scheme grammar: a leading ASCII letter, then
    /// letters, digits, `+`, `-` or `.`.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.scheme.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            }
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(OrmmaError::Config(format!(
                "invalid address scheme {:?}",
                self.scheme
            )))
        }
    }
}
