// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::net::{SocketAddr, TcpListener};

use crate::{Config, Error, Result, Served, handle_connection};

/// A listening socket that serves exactly one connection.
///
/// # Example
///
/// ```no_run
/// use static_httpd::{Config, Server};
///
/// let server = Server::bind(Config::default())?;
/// let served = server.serve_once()?;
///
/// println!("responded with {}", served.status);
/// # Ok::<(), static_httpd::Error>(())
/// ```
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: Config,
}

impl Server {
    /// Binds a listening socket to the configured address and port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] if the socket cannot be bound, e.g. because the port is in use.
    pub fn bind(config: Config) -> Result<Self> {
        let address = config.socket_addr();

        let listener = TcpListener::bind(address).map_err(|source| {
            tracing::error!(%address, error = %source, "binding socket failed");
            Error::Bind { address, source }
        })?;

        let local_addr = listener.local_addr().map_err(|source| Error::Bind { address, source })?;

        tracing::info!(address = %local_addr, "socket bound, listening for connections");

        Ok(Self { listener, config })
    }

    /// The address the socket is listening on, including the port chosen by the operating system
    /// when port 0 was configured.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the operating system.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The configuration the server was bound with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Waits for one connection, serves it and closes both it and the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Accept`] if no connection can be accepted, or the error of
    /// [`handle_connection()`] if serving the connection fails.
    pub fn serve_once(self) -> Result<Served> {
        let (mut stream, peer) = self.listener.accept().map_err(|e| {
            tracing::error!(error = %e, "accepting connection failed");
            Error::Accept(e)
        })?;

        tracing::info!(%peer, "connection accepted");

        let served = handle_connection(&mut stream, &self.config)?;

        tracing::info!(%peer, status = served.status.code(), body_bytes = served.body_bytes, "connection served");

        Ok(served)
    }
}
