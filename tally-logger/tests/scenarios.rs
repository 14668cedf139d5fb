// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tally_core::{BoxClient, Client, Event, SignedDuration, Tags, test_util::RecordingLogger};
use tally_logger::LoggerClient;

fn client() -> (RecordingLogger, BoxClient) {
    let recorder = RecordingLogger::new();
    let client = LoggerClient::with_logger(recorder.clone()).boxed();
    (recorder, client)
}

#[test]
fn tagged_incr() {
    let (recorder, client) = client();
    client
        .with_tags(Tags::from([("tag1", "value1")]))
        .incr("requests.count");
    assert_eq!(
        recorder.last().as_deref(),
        Some("Count requests.count:1 map[tag1:value1]")
    );
}

#[test]
fn plain_incr() {
    let (recorder, client) = client();
    client.incr("one");
    assert_eq!(recorder.last().as_deref(), Some("Count one:1 map[]"));
}

#[test]
fn event() {
    let (recorder, client) = client();
    client.event(&Event::new("title", "desc"));
    assert_eq!(recorder.last().as_deref(), Some("Event title\ndesc map[]"));
}

#[test]
fn overridden_tag_timing() {
    let (recorder, client) = client();
    client
        .with_tags(Tags::from([("tag1", "value1")]))
        .with_tags(Tags::from([("tag1", "override")]))
        .timing("two", SignedDuration::from_secs(2));
    assert_eq!(
        recorder.last().as_deref(),
        Some("Timing two:2s map[tag1:override]")
    );
}

#[test]
fn plain_decr() {
    let (recorder, client) = client();
    client.decr("one");
    assert_eq!(recorder.last().as_deref(), Some("Count one:-1 map[]"));
}

#[test]
fn gauge() {
    let (recorder, client) = client();
    client.gauge("memory", 1024.0);
    assert_eq!(recorder.last().as_deref(), Some("Gauge memory:1024 map[]"));
}

fn random_tags(rng: &mut ChaCha8Rng) -> BTreeMap<String, String> {
    let len = rng.random_range(0..6);
    (0..len)
        .map(|_| {
            (
                format!("k{}", rng.random_range(0..8)),
                format!("v{}", rng.random_range(0..100)),
            )
        })
        .collect()
}

/// `with_tags(a).with_tags(b)` renders exactly `a` overlaid with `b`, and neither the parent nor
/// the intermediate client observe `b`.
#[test]
fn chained_tags_merge_with_later_keys_winning() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x7a11);
    for _ in 0..200 {
        let a = random_tags(&mut rng);
        let b = random_tags(&mut rng);
        let mut expected = a.clone();
        expected.extend(b.clone());

        let (recorder, root) = client();
        let first = root.with_tags(Tags::from(a.clone()));
        let second = first.with_tags(Tags::from(b.clone()));
        second.incr("x");
        first.incr("x");
        root.incr("x");

        let lines = recorder.messages();
        assert_eq!(lines[0], format!("Count x:1 {}", Tags::from(expected)));
        assert_eq!(lines[1], format!("Count x:1 {}", Tags::from(a)));
        assert_eq!(lines[2], "Count x:1 map[]");
    }
}
