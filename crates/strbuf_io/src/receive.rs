// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// A connected socket that bytes can be received from.
///
/// This is the socket counterpart of [`std::io::Read`], which [`read()`][crate::read] uses for
/// local descriptors such as files and pipes. Keeping the two apart lets the type system tell a
/// network peer from a local file, even though both end up as a plain descriptor.
///
/// # Contract
///
/// Implementations fill the start of `into` and return the number of bytes placed there, which
/// must not exceed `into.len()`. Returning `Ok(0)` for a non-empty `into` means the peer performed
/// an orderly shutdown and no more bytes will ever arrive. An error of kind
/// [`Interrupted`][io::ErrorKind::Interrupted] means nothing happened and the call may be retried.
pub trait Receive {
    /// Receives at most `into.len()` bytes from the socket.
    ///
    /// Blocks until at least one byte, the end of the stream or an error is available.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the socket.
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize>;
}

/// Receives via `recv(2)` without flags, which is what the standard library performs when reading
/// from a TCP stream.
impl Receive for TcpStream {
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, into)
    }
}

impl Receive for &TcpStream {
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, into)
    }
}

#[cfg(unix)]
impl Receive for UnixStream {
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, into)
    }
}

#[cfg(unix)]
impl Receive for &UnixStream {
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, into)
    }
}

impl<R: Receive + ?Sized> Receive for &mut R {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        (**self).receive(into)
    }
}
