// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Routes metric lines through `tracing` instead of stdout.
//!
//! Run with `RUST_LOG=tally=info` to see the lines, `RUST_LOG=tally=off` to hide them.

use tally::{Client, LoggerClient, Tags, TracingLogger};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = LoggerClient::with_logger(TracingLogger::new());
    client
        .with_tags(Tags::from([("tag1", "value1")]))
        .incr("requests.count");
    client.gauge("memory", 1024.0);
}
