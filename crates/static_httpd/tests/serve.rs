// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
#![allow(missing_docs, reason = "Tests")]

//! Serves requests over real loopback connections.

use std::fs;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, Shutdown, TcpStream};
use std::thread;

use pretty_assertions::assert_eq;
use static_httpd::{Config, Error, Server, Status};
use tempfile::TempDir;
use testing_aids::{execute_or_terminate_process, repeating_incrementing_bytes};

fn document_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    dir
}

fn config(root: &TempDir) -> Config {
    Config {
        address: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        root: root.path().to_path_buf(),
        ..Config::default()
    }
}

/// Serves one connection on which `request` is sent in the given pieces, returning the result of
/// serving and the complete response.
fn exchange(config: Config, pieces: Vec<Vec<u8>>) -> (static_httpd::Result<static_httpd::Served>, Vec<u8>) {
    let server = Server::bind(config).unwrap();
    let address = server.local_addr().unwrap();

    let client = thread::spawn(move || {
        let mut stream = TcpStream::connect(address).unwrap();
        stream.set_nodelay(true).unwrap();

        // The server may reset a connection it gave up on, so failures past this point only
        // shorten the response.
        for piece in pieces {
            if stream.write_all(&piece).is_err() {
                break;
            }
            thread::yield_now();
        }

        let _ = stream.shutdown(Shutdown::Write);

        let mut response = Vec::new();
        let _ = stream.read_to_end(&mut response);
        response
    });

    let served = server.serve_once();
    (served, client.join().unwrap())
}

#[test]
fn get_existing_file() {
    execute_or_terminate_process(|| {
        testing_aids::log_to_stdout();
        let root = document_root();

        let (served, response) = exchange(
            config(&root),
            vec![b"GET /index.html HTTP/1.1\r\nHost: local".to_vec(), b"host\r\n\r\n".to_vec()],
        );

        assert_eq!(served.unwrap().status, Status::Ok);
        assert_eq!(
            String::from_utf8(response).unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<h1>Hello</h1>"
        );
    });
}

#[test]
fn large_file_streams_completely() {
    execute_or_terminate_process(|| {
        let root = document_root();
        let contents: Vec<u8> = repeating_incrementing_bytes().take(100_000).collect();
        fs::write(root.path().join("large.bin"), &contents).unwrap();

        let (served, response) = exchange(config(&root), vec![b"GET /large.bin HTTP/1.1\r\n\r\n".to_vec()]);

        let served = served.unwrap();
        assert_eq!(served.body_bytes, contents.len());

        let body_start = response.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        assert!(response[body_start..] == contents[..]);
    });
}

#[test]
fn missing_file() {
    execute_or_terminate_process(|| {
        let root = document_root();

        let (served, response) = exchange(config(&root), vec![b"GET /nope.html HTTP/1.1\r\n\r\n".to_vec()]);

        assert_eq!(served.unwrap().status, Status::NotFound);
        assert!(String::from_utf8(response).unwrap().ends_with("\r\n\r\nFile not found: /nope.html"));
    });
}

#[test]
fn malformed_request() {
    execute_or_terminate_process(|| {
        let root = document_root();

        let (served, response) = exchange(config(&root), vec![b"GARBAGE\r\n\r\n".to_vec()]);

        assert_eq!(served.unwrap().status, Status::BadRequest);
        assert!(String::from_utf8(response).unwrap().starts_with("HTTP/1.1 400 Bad Request\r\n"));
    });
}

#[test]
fn header_without_terminator() {
    execute_or_terminate_process(|| {
        let root = document_root();

        let (served, response) = exchange(config(&root), vec![b"GET /index.html HTTP/1.1\r\n".to_vec()]);

        let error = served.unwrap_err();
        assert!(matches!(&error, Error::Transfer(e) if e.is_connection_closed()));
        assert!(response.is_empty());
    });
}

#[test]
fn header_over_limit() {
    execute_or_terminate_process(|| {
        let root = document_root();
        let config = Config {
            max_header_bytes: 64,
            ..config(&root)
        };

        let mut request = b"GET /index.html HTTP/1.1\r\n".to_vec();
        request.extend(std::iter::repeat_n(b'x', 1000));

        let (served, _) = exchange(config, vec![request]);

        assert!(matches!(
            served.unwrap_err(),
            Error::Transfer(strbuf_io::Error::HeaderTooLarge { limit: 64 })
        ));
    });
}
