// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the ORMMA bridge.

use thiserror::Error;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum OrmmaError {
    // -- Page-facing input --
    #[error("unknown bridge event: {0}")]
    UnknownEvent(String),

    #[error("unknown navigation control: {0}")]
    UnknownNavigationControl(String),

    #[error("invalid expand properties: {0}")]
    InvalidExpandProperties(String),

    // -- Host transport --
    #[error("host transport error: {0}")]
    Transport(String),

    #[error("no host transport available on this platform")]
    TransportUnavailable,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OrmmaError>;
