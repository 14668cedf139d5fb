// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Sends metrics to a DogStatsD agent.
//!
//! The agent address comes from `DD_AGENT_HOST` / `DD_DOGSTATSD_PORT` (default `127.0.0.1:8125`).
//! Without an agent, run `nc -ul 8125` to watch the datagrams.

use tally::{
    AlertType, Client, Event, SignedDuration, Tags,
    statsd::{BuildError, StatsdClientBuilder},
};

fn main() -> Result<(), BuildError> {
    tracing_subscriber::fmt::init();

    let client = StatsdClientBuilder::from_env()
        .namespace("demo.")
        .constant_tags(Tags::from([("example", "statsd")]))
        .build()?;

    let scoped = client.with_tags(Tags::from([("route", "/health")]));
    scoped.incr("requests.count");
    scoped.timing("requests.latency", SignedDuration::from_millis(12));
    client.gauge("memory", 1024.0);
    client.event(
        &Event::new("deploy", "statsd example ran\nsuccessfully").with_alert_type(AlertType::Success),
    );
    Ok(())
}
