// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound address encoding.
//
// Every native call travels as `<scheme>://<command>?k1=v1&k2=v2`. Keys are
// written verbatim; values are escaped with the same safe set as the
// JavaScript `escape()` global so hosts can decode them unchanged.

use std::fmt::{self, Display};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `escape()` leaves untouched besides ASCII alphanumerics.
const ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Escape a parameter value for inclusion in an address.
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, ESCAPE_SET).to_string()
}

/// Incrementally built native-call address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAddress {
    text: String,
    has_query: bool,
}

impl NativeAddress {
    pub fn new(scheme: &str, command: &str) -> Self {
        Self {
            text: format!("{scheme}://{command}"),
            has_query: false,
        }
    }

    /// Append `key=value`. A `None` value drops the pair entirely.
    pub fn push<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.text.push(if self.has_query { '&' } else { '?' });
            self.has_query = true;
            self.text.push_str(key);
            self.text.push('=');
            self.text.push_str(&escape(&value.to_string()));
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Display for NativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Boolean flags travel as literal `Y` / `N`.
pub fn flag(value: bool) -> &'static str {
    if value { "Y" } else { "N" }
}
