// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Accepts a single HTTP connection, serves one static file and exits.
//!
//! # Usage
//!
//! ```bash
//! static_httpd --port 8080 --root static
//! ```
//!
//! Log verbosity follows `RUST_LOG` when set, `--log-level` otherwise.

use anyhow::{Context, Result};
use clap::Parser;
use static_httpd::{Config, Server};
use tracing_subscriber::EnvFilter;

#[cfg_attr(test, mutants::skip)] // Process entry point, exercised end to end by tests/cli.rs.
fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .from_env_lossy(),
        )
        .init();

    let address = config.socket_addr();
    let server = Server::bind(config).with_context(|| format!("failed to start the server on {address}"))?;
    let served = server.serve_once().context("failed to serve the connection")?;

    tracing::info!(status = %served.status, body_bytes = served.body_bytes, "done");

    Ok(())
}
