// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scripted descriptors for testing code that uses `strbuf_io`.
//!
//! Available with the `test-util` feature.

mod fake_sink;
mod fake_source;

pub use fake_sink::*;
pub use fake_source::*;
