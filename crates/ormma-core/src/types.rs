// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the ORMMA bridge.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::OrmmaError;

/// Acknowledgement returned to the host from every inbound entry point.
pub const HOST_ACK: &str = "OK";

/// The closed set of events the host can push into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// An asset finished caching.
    AssetReady,
    /// An asset was removed at the creative's request.
    AssetRemoved,
    /// An asset was evicted by the host for its own reasons.
    AssetRetired,
    /// One or more state properties changed.
    Change,
    /// Something went wrong, host side or validation side.
    Error,
    /// The user shook the device.
    Shake,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        Self::AssetReady,
        Self::AssetRemoved,
        Self::AssetRetired,
        Self::Change,
        Self::Error,
        Self::Shake,
    ];

    /// Name used by creative code when registering listeners.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetReady => "assetReady",
            Self::AssetRemoved => "assetRemoved",
            Self::AssetRetired => "assetRetired",
            Self::Change => "change",
            Self::Error => "error",
            Self::Shake => "shake",
        }
    }
}

impl FromStr for EventKind {
    type Err = OrmmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| OrmmaError::UnknownEvent(s.to_string()))
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to listeners. The host's arguments pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BridgeEvent {
    AssetReady { alias: String, url: String },
    AssetRemoved { alias: String },
    AssetRetired { alias: String },
    Change { properties: serde_json::Value },
    Error { message: String, action: String },
    Shake,
}

impl BridgeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AssetReady { .. } => EventKind::AssetReady,
            Self::AssetRemoved { .. } => EventKind::AssetRemoved,
            Self::AssetRetired { .. } => EventKind::AssetRetired,
            Self::Change { .. } => EventKind::Change,
            Self::Error { .. } => EventKind::Error,
            Self::Shake => EventKind::Shake,
        }
    }
}

/// A single entry of the navigation-control list passed to `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationControl {
    None,
    All,
    Back,
    Forward,
    Refresh,
}

impl NavigationControl {
    /// `none` and `all` may only appear as the sole element of the list.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::None | Self::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::Back => "back",
            Self::Forward => "forward",
            Self::Refresh => "refresh",
        }
    }
}

impl FromStr for NavigationControl {
    type Err = OrmmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "refresh" => Ok(Self::Refresh),
            other => Err(OrmmaError::UnknownNavigationControl(other.to_string())),
        }
    }
}

/// Target frame for `expand`. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Presentation options applied to the next `expand` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpandProperties {
    pub use_background: Option<bool>,
    pub background_color: Option<String>,
    /// Expected in `0.0..=1.0`.
    pub background_opacity: Option<f64>,
}

/// Shake-detection tuning requested by the creative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeProperties {
    /// Minimum milliseconds between two reported shakes.
    pub interval: Option<u32>,
    /// Acceleration threshold.
    pub intensity: Option<f64>,
}

/// A page-side call, in a form that can be scripted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum PageCall {
    Open {
        url: String,
        #[serde(default)]
        controls: Option<Vec<String>>,
    },
    Expand {
        #[serde(default)]
        dimensions: Dimensions,
        #[serde(default)]
        url: Option<String>,
    },
    Resize {
        width: u32,
        height: u32,
    },
    Show,
    Hide,
    Close,
    SetExpandProperties {
        properties: ExpandProperties,
    },
    SetShakeProperties {
        properties: ShakeProperties,
    },
    CreateEvent {
        date: NaiveDateTime,
        title: String,
        #[serde(default)]
        body: Option<String>,
    },
    MakeCall {
        number: String,
    },
    SendMail {
        to: String,
        #[serde(default)]
        subject: Option<String>,
        #[serde(default)]
        body: Option<String>,
    },
    #[serde(rename = "sendSMS")]
    SendSms {
        to: String,
        #[serde(default)]
        body: Option<String>,
    },
    AddAsset {
        url: String,
        alias: String,
    },
    RemoveAsset {
        alias: String,
    },
    Request {
        uri: String,
        #[serde(default)]
        display: Option<String>,
    },
    Activate {
        name: String,
    },
    Deactivate {
        name: String,
    },
}

/// An inbound invocation made by the native host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum HostCall {
    AssetReady {
        alias: String,
        url: String,
    },
    AssetRemoved {
        alias: String,
    },
    AssetRetired {
        alias: String,
    },
    Change {
        properties: serde_json::Value,
    },
    Error {
        message: String,
        action: String,
    },
    Shake,
    CallComplete {
        #[serde(default)]
        token: Option<String>,
    },
    ShowAlert {
        message: String,
    },
}
