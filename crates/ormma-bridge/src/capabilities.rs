// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability calls exposed to creative code.
//
// Each call validates or reshapes its arguments and hands an address to the
// dispatcher. Validation problems are reported to `error` listeners rather
// than returned, so creative code never sees them as failures.

use chrono::{Datelike, NaiveDateTime, Timelike};
use ormma_core::error::{OrmmaError, Result};
use ormma_core::types::{Dimensions, ExpandProperties, NavigationControl, PageCall, ShakeProperties};
use tracing::warn;

use crate::address::flag;
use crate::bridge::Bridge;
use crate::traits::HostTransport;

/// Which browser controls `open` asks the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationFlags {
    pub back: bool,
    pub forward: bool,
    pub refresh: bool,
}

impl NavigationFlags {
    const ALL: Self = Self { back: true, forward: true, refresh: true };
    const NONE: Self = Self { back: false, forward: false, refresh: false };

    /// Resolve a navigation-control list. `None` enables every control.
    ///
    /// `none` and `all` are only accepted as the sole element. On failure
    /// the returned message is meant for `error` listeners.
    pub fn resolve(controls: Option<&[&str]>) -> std::result::Result<Self, String> {
        let Some(controls) = controls else {
            return Ok(Self::ALL);
        };

        let mut flags = Self::NONE;
        for token in controls {
            let control = token
                .parse::<NavigationControl>()
                .map_err(|_| format!("{token} is not a valid navigation element."))?;

            if control.is_exclusive() && controls.len() > 1 {
                return Err(format!(
                    "{} must be the only navigation element present.",
                    control.as_str()
                ));
            }

            match control {
                NavigationControl::None => {}
                NavigationControl::All => flags = Self::ALL,
                NavigationControl::Back => flags.back = true,
                NavigationControl::Forward => flags.forward = true,
                NavigationControl::Refresh => flags.refresh = true,
            }
        }
        Ok(flags)
    }
}

/// Calendar timestamp `YYYYMMDDHHmm`. The year is not padded.
pub fn calendar_timestamp(date: &NaiveDateTime) -> String {
    format!(
        "{}{:02}{:02}{:02}{:02}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute()
    )
}

fn check_opacity(opacity: f64) -> Result<f64> {
    if opacity.is_finite() && (0.0..=1.0).contains(&opacity) {
        Ok(opacity)
    } else {
        Err(OrmmaError::InvalidExpandProperties(format!(
            "background opacity {opacity} is outside 0..=1"
        )))
    }
}

impl<T: HostTransport> Bridge<T> {
    // -- Level 0 --

    /// Ask the host to start delivering a named service's events.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        self.execute_native_call("service", &[("name", Some(name)), ("enabled", Some(flag(true)))])
    }

    /// Ask the host to stop delivering a named service's events.
    pub fn deactivate(&mut self, name: &str) -> Result<()> {
        self.execute_native_call("service", &[("name", Some(name)), ("enabled", Some(flag(false)))])
    }

    // -- Level 1 --

    pub fn close(&mut self) -> Result<()> {
        self.execute_native_call("close", &[])
    }

    pub fn hide(&mut self) -> Result<()> {
        self.execute_native_call("hide", &[])
    }

    pub fn show(&mut self) -> Result<()> {
        self.execute_native_call("show", &[])
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let mut address = self.address("resize");
        address.push("w", Some(width)).push("h", Some(height));
        self.dispatch(address)
    }

    /// Open `url` in the host browser with the requested controls.
    pub fn open(&mut self, url: &str, controls: Option<&[&str]>) -> Result<()> {
        let flags = match NavigationFlags::resolve(controls) {
            Ok(flags) => flags,
            Err(message) => {
                warn!(%message, "open rejected");
                self.fire_error_event(&message, "open");
                return Ok(());
            }
        };

        self.execute_native_call(
            "open",
            &[
                ("url", Some(url)),
                ("back", Some(flag(flags.back))),
                ("forward", Some(flag(flags.forward))),
                ("refresh", Some(flag(flags.refresh))),
            ],
        )
    }

    /// Expand to `dimensions`, optionally loading `url`, using the current
    /// expand properties. Undefined fields are left out of the address.
    pub fn expand(&mut self, dimensions: &Dimensions, url: Option<&str>) -> Result<()> {
        let props = self.expand_properties.clone();
        let mut address = self.address("expand");
        address
            .push("url", url)
            .push("x", dimensions.x)
            .push("y", dimensions.y)
            .push("w", dimensions.width)
            .push("h", dimensions.height)
            .push("useBG", props.use_background.map(flag))
            .push("bgColor", props.background_color.as_deref());

        let opacity = match props.background_opacity.map(check_opacity).transpose() {
            Ok(opacity) => opacity,
            Err(e) => {
                let message = format!("executeNativeExpand: {e}, cmd = {address}");
                warn!(%message, "expand merge failed");
                self.transport.alert(&message);
                return Ok(());
            }
        };
        address.push("bgOpacity", opacity);

        self.dispatch(address)
    }

    /// Replace the expand properties wholesale.
    pub fn set_expand_properties(&mut self, properties: ExpandProperties) {
        self.expand_properties = properties;
    }

    pub fn expand_properties(&self) -> &ExpandProperties {
        &self.expand_properties
    }

    /// Replace the shake properties wholesale. Nothing is sent to the host.
    pub fn set_shake_properties(&mut self, properties: ShakeProperties) {
        self.shake_properties = properties;
    }

    pub fn shake_properties(&self) -> &ShakeProperties {
        &self.shake_properties
    }

    // -- Level 2 --

    /// Add a calendar entry.
    pub fn create_event(
        &mut self,
        date: &NaiveDateTime,
        title: &str,
        body: Option<&str>,
    ) -> Result<()> {
        let stamp = calendar_timestamp(date);
        self.execute_native_call(
            "calendar",
            &[("date", Some(stamp.as_str())), ("title", Some(title)), ("body", body)],
        )
    }

    pub fn make_call(&mut self, number: &str) -> Result<()> {
        self.execute_native_call("phone", &[("number", Some(number))])
    }

    /// Compose a plain-text email.
    pub fn send_mail(&mut self, to: &str, subject: Option<&str>, body: Option<&str>) -> Result<()> {
        self.execute_native_call(
            "email",
            &[
                ("to", Some(to)),
                ("subject", subject),
                ("body", body),
                ("html", Some(flag(false))),
            ],
        )
    }

    pub fn send_sms(&mut self, to: &str, body: Option<&str>) -> Result<()> {
        self.execute_native_call("sms", &[("to", Some(to)), ("body", body)])
    }

    // -- Level 3 --

    /// Ask the host to cache `url` under `alias`.
    pub fn add_asset(&mut self, url: &str, alias: &str) -> Result<()> {
        self.execute_native_call("addasset", &[("uri", Some(url)), ("alias", Some(alias))])
    }

    pub fn remove_asset(&mut self, alias: &str) -> Result<()> {
        self.execute_native_call("removeasset", &[("alias", Some(alias))])
    }

    pub fn request(&mut self, uri: &str, display: Option<&str>) -> Result<()> {
        self.execute_native_call("request", &[("uri", Some(uri)), ("display", display)])
    }

    /// Run a scripted page call.
    pub fn apply_page_call(&mut self, call: PageCall) -> Result<()> {
        match call {
            PageCall::Open { url, controls } => {
                let controls: Option<Vec<&str>> =
                    controls.as_ref().map(|list| list.iter().map(String::as_str).collect());
                self.open(&url, controls.as_deref())
            }
            PageCall::Expand { dimensions, url } => self.expand(&dimensions, url.as_deref()),
            PageCall::Resize { width, height } => self.resize(width, height),
            PageCall::Show => self.show(),
            PageCall::Hide => self.hide(),
            PageCall::Close => self.close(),
            PageCall::SetExpandProperties { properties } => {
                self.set_expand_properties(properties);
                Ok(())
            }
            PageCall::SetShakeProperties { properties } => {
                self.set_shake_properties(properties);
                Ok(())
            }
            PageCall::CreateEvent { date, title, body } => {
                self.create_event(&date, &title, body.as_deref())
            }
            PageCall::MakeCall { number } => self.make_call(&number),
            PageCall::SendMail { to, subject, body } => {
                self.send_mail(&to, subject.as_deref(), body.as_deref())
            }
            PageCall::SendSms { to, body } => self.send_sms(&to, body.as_deref()),
            PageCall::AddAsset { url, alias } => self.add_asset(&url, &alias),
            PageCall::RemoveAsset { alias } => self.remove_asset(&alias),
            PageCall::Request { uri, display } => self.request(&uri, display.as_deref()),
            PageCall::Activate { name } => self.activate(&name),
            PageCall::Deactivate { name } => self.deactivate(&name),
        }
    }
}
