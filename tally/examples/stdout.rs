// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Writes a handful of metrics to stdout with the default `LoggerClient`.

use tally::{Client, ClientExt, Event, LoggerClient, SignedDuration, Tags};

fn handle(client: &dyn Client, route: &str) {
    let client = client.with_tags(Tags::from([("route", route)]));
    client.incr("requests.count");
    let body_len = client.time("requests.render", || "hello world".len());
    client.histogram("requests.body_bytes", body_len as f64);
}

fn main() {
    let client = LoggerClient::default().tagged(Tags::from([("service", "demo")]));

    handle(&client, "/health");
    handle(&client, "/users");

    client.gauge("memory", 1024.0);
    client.timing("startup", SignedDuration::from_millis(1500));
    client.decr("workers.idle");
    client.event(&Event::new("deploy", "demo finished"));

    // roughly half of these are printed, each showing the rate
    let sampled = client.with_rate(0.5);
    for _ in 0..6 {
        sampled.incr("cache.lookups");
    }
}
