// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use strbuf_io::{DEFAULT_CHUNK_SIZE, DEFAULT_HEADER_LIMIT};
use tracing::level_filters::LevelFilter;

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// Directory files are served from unless configured otherwise, relative to the working directory.
pub const DEFAULT_ROOT: &str = "static";

/// Server configuration, parsed from the command line.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "static_httpd",
    version,
    about = "Accepts a single HTTP connection, serves one static file and exits"
)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub address: IpAddr,

    /// Port to listen on. Use 0 to let the operating system pick one.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory that request paths are resolved against.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Bytes requested per receive and file read call; at most one less arrives per call.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    /// Largest request header accepted, in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_HEADER_LIMIT)]
    pub max_header_bytes: usize,

    /// Most verbose log level emitted unless `RUST_LOG` says otherwise.
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,
}

impl Config {
    /// The address the listening socket binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_header_bytes: DEFAULT_HEADER_LIMIT,
            log_level: LevelFilter::INFO,
        }
    }
}

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    let chunk_size: usize = value.parse().map_err(|e| format!("{e}"))?;

    if chunk_size < 2 {
        return Err(format!("must be at least 2 but was {chunk_size}"));
    }

    Ok(chunk_size)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["static_httpd"]).unwrap();
        let default = Config::default();

        assert_eq!(parsed.socket_addr(), default.socket_addr());
        assert_eq!(parsed.socket_addr(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(parsed.root, default.root);
        assert_eq!(parsed.chunk_size, 256);
        assert_eq!(parsed.max_header_bytes, 8192);
        assert_eq!(parsed.log_level, LevelFilter::INFO);
    }

    #[test]
    fn all_flags() {
        let config = Config::try_parse_from([
            "static_httpd",
            "--address",
            "127.0.0.1",
            "--port",
            "0",
            "--root",
            "/srv/www",
            "--chunk-size",
            "4096",
            "--max-header-bytes",
            "1024",
            "--log-level",
            "trace",
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:0".parse().unwrap());
        assert_eq!(config.root, PathBuf::from("/srv/www"));
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.max_header_bytes, 1024);
        assert_eq!(config.log_level, LevelFilter::TRACE);
    }

    #[test]
    fn tiny_chunk_size_is_rejected() {
        let error = Config::try_parse_from(["static_httpd", "--chunk-size", "1"]).unwrap_err();

        assert!(error.to_string().contains("at least 2"));
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;

        Config::command().debug_assert();
    }
}
