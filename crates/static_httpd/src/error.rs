// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::net::SocketAddr;

use thiserror::Error;

/// An error that prevented the server from serving its connection.
///
/// Problems with the request itself (malformed request line, missing file, unsupported method) are
/// not errors: the server answers them with an error status.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The listening socket could not be created or bound.
    #[error("binding a listening socket to {address} failed")]
    Bind {
        /// The address that could not be bound.
        address: SocketAddr,
        /// The error reported by the operating system.
        #[source]
        source: std::io::Error,
    },

    /// Accepting the connection failed.
    #[error("accepting a connection failed")]
    Accept(#[source] std::io::Error),

    /// Receiving the request or sending the response failed.
    #[error(transparent)]
    Transfer(#[from] strbuf_io::Error),
}

impl From<strbuf::Error> for Error {
    fn from(value: strbuf::Error) -> Self {
        Self::Transfer(value.into())
    }
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;
