// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    sync::{Arc, Mutex},
};

use metrics_util_020::debugging::{DebugValue, DebuggingRecorder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tally_core::{BoxClient, Client, Event, Tags, sample::SeededSampler};
use tally_metricsrs::MetricsRsClient;
use tracing_subscriber::fmt::MakeWriter;

#[test]
fn default_client_uses_the_installed_recorder() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client: BoxClient = MetricsRsClient::new().boxed();
    metrics_024::with_local_recorder(&recorder, || {
        client
            .with_tags(Tags::from([("tag1", "value1")]))
            .incr("requests.count");
    });
    // outside of the local recorder scope nothing is installed
    client.incr("requests.count");

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(snapshot.len(), 1, "{snapshot:#?}");
    let (key, _, _, value) = &snapshot[0];
    assert_eq!(key.key().name(), "requests.count");
    assert!(matches!(value, DebugValue::Counter(1)), "{value:?}");
}

#[test]
fn upweighted_sampling_estimates_the_total() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client = MetricsRsClient::local(recorder)
        .with_sampler(SeededSampler::new(ChaCha8Rng::seed_from_u64(3)))
        .rated(0.1);
    for _ in 0..20_000 {
        client.incr("jobs");
    }
    let snapshot = snapshotter.snapshot().into_vec();
    let DebugValue::Counter(total) = snapshot[0].3 else {
        panic!("unexpected metrics: {snapshot:#?}")
    };
    // each surviving increment counts for 10
    assert_eq!(total % 10, 0);
    assert!((18_000..22_000).contains(&total), "total {total}");
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuf {
    type Writer = SharedBuf;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn events_become_tracing_events() {
    let buf = SharedBuf::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_ansi(false)
        .finish();
    let client = MetricsRsClient::local(DebuggingRecorder::new())
        .tagged(Tags::from([("env", "prod"), ("k", "client")]));
    tracing::subscriber::with_default(subscriber, || {
        client.event(&Event::new("deploy", "done").with_tags(Tags::from([("k", "event")])));
    });
    let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("INFO tally::event"), "{output}");
    assert!(output.contains("title=deploy"), "{output}");
    assert!(output.contains("text=done"), "{output}");
    assert!(output.contains("tags=map[env:prod k:event]"), "{output}");
}
