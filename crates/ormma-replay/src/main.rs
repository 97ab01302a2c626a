// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ormma-replay — runs a scripted creative/host conversation through the
// bridge and prints every address, alert and event it produces.
//
// Usage: ormma-replay <script.json> [config.json]

mod script;
mod transcript;

use std::process::ExitCode;

use ormma_core::config::BridgeConfig;
use ormma_core::error::Result;

use transcript::Transcript;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next() else {
        eprintln!("usage: ormma-replay <script.json> [config.json]");
        return ExitCode::from(2);
    };
    let config_path = args.next();

    match replay(&script_path, config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn replay(script_path: &str, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    tracing::info!(script = script_path, scheme = %config.scheme, "replay starting");

    let steps = script::load_script(script_path)?;
    script::run(steps, config, &Transcript::echoing())
}
