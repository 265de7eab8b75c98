// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An unpublished crate containing testing utilities for use within this repo.

use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;
use std::time::Duration;
use std::{env, process, thread};

mod log;

pub use log::*;

/// If something (whatever) does not happen in a test within this time, the test will fail.
///
/// This is only to break out of blocked sockets and infinite loops, not for any situations that are
/// actually expected.
///
/// This should be significantly smaller than the .cargo/mutants.toml timeout because multiple
/// tests may be executed during a single cargo-mutants run.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

#[must_use]
pub fn is_mutation_testing() -> bool {
    env::var("MUTATION_TESTING").as_deref() == Ok("1")
}

/// Executes a function on the current thread and sets up a watchdog timer that terminates the
/// process if the target function does not complete before [`TEST_TIMEOUT`].
///
/// Blocking socket I/O cannot be cancelled from the outside, so a test that would otherwise hang
/// forever on a silent peer ends the process instead.
///
/// # Panics
///
/// Panics if the test panics.
#[cfg_attr(test, mutants::skip)] // This is test logic - pointless to mutate.
pub fn execute_or_terminate_process<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    if is_mutation_testing() {
        // Under mutation testing, hangs must show up as actual "timeout" results.
        return f();
    }

    let (sender, receiver) = mpsc::channel();

    let watchdog = thread::Builder::new()
        .name("test watchdog".to_string())
        .spawn(move || {
            if receiver.recv_timeout(TEST_TIMEOUT).is_err() {
                eprintln!("Test timed out, terminating process.");
                #[expect(
                    clippy::exit,
                    reason = "test harness is intentionally terminating test process that cannot continue execution"
                )]
                // Arbitrary value in portable range (8 bits) to signal "emergency timeout".
                process::exit(112);
            }
        })
        .unwrap();

    let result = catch_unwind(AssertUnwindSafe(f));

    // We signal "done" no matter whether it panics or succeeds, all we care about is timeout.
    sender.send(()).unwrap();
    watchdog.join().unwrap();

    // This will re-raise any panic if one occurred.
    result.unwrap()
}

/// Connects a pair of TCP sockets over the loopback interface.
///
/// Returns `(client, server)`: the socket that connected and the socket that was accepted.
///
/// # Panics
///
/// Panics if the loopback interface is unavailable.
#[cfg_attr(test, mutants::skip)] // This is test logic - pointless to mutate.
#[must_use]
pub fn tcp_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let (server, _) = listener.accept().unwrap();

    (client, server)
}

/// Standard test data generator - a repeating sequence of bytes from 0 to 255.
pub fn repeating_incrementing_bytes() -> impl Iterator<Item = u8> {
    (0..=u8::MAX).cycle()
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn tcp_pair_is_connected() {
        execute_or_terminate_process(|| {
            let (mut client, mut server) = tcp_pair();

            client.write_all(b"hello").unwrap();
            drop(client);

            let mut received = Vec::new();
            server.read_to_end(&mut received).unwrap();

            assert_eq!(received, b"hello");
        });
    }

    #[test]
    fn watchdog_returns_result() {
        assert_eq!(execute_or_terminate_process(|| 42), 42);
    }

    #[test]
    fn incrementing_bytes_wrap_around() {
        let bytes: Vec<u8> = repeating_incrementing_bytes().skip(254).take(4).collect();

        assert_eq!(bytes, [254, 255, 0, 1]);
    }
}
