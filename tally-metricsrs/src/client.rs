// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc};

use derive_where::derive_where;
use tally_core::{
    BoxClient, Client, Event, SignedDuration, Tags,
    sample::{self, Decision, Sampler, ThreadRngSampler},
};

use crate::recorder::{self, GlobalRecorder, LocalRecorder, RecorderSource};

/// A [`Client`] forwarding to a metrics.rs 0.24 recorder.
///
/// Derived clients share the recorder and sampler of their parent.
#[derive_where(Clone)]
pub struct MetricsRsClient<S = GlobalRecorder> {
    source: Arc<S>,
    sampler: Arc<dyn Sampler>,
    rate: f64,
    tags: Tags,
}

impl<S> fmt::Debug for MetricsRsClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRsClient")
            .field("rate", &self.rate)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl MetricsRsClient {
    /// A client using the installed recorder, see [`GlobalRecorder`].
    pub fn new() -> Self {
        Self::with_source(GlobalRecorder)
    }
}

impl Default for MetricsRsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: metrics_024::Recorder + Send + Sync + 'static> MetricsRsClient<LocalRecorder<R>> {
    /// A client recording into `recorder` regardless of what is installed globally.
    pub fn local(recorder: R) -> Self {
        Self::with_source(LocalRecorder(recorder))
    }
}

impl<S: RecorderSource> MetricsRsClient<S> {
    /// A client using the recorder provided by `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            source: Arc::new(source),
            sampler: Arc::new(ThreadRngSampler::new()),
            rate: 1.0,
            tags: Tags::new(),
        }
    }

    /// Replace the source of random draws used for sampling.
    pub fn with_sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    /// The sample rate of this client.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The tags of this client.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Like [`Client::with_tags`], but returns the concrete type.
    pub fn tagged(&self, tags: Tags) -> Self {
        Self {
            tags: self.tags.merged(&tags),
            ..self.clone()
        }
    }

    /// Like [`Client::with_rate`], but returns the concrete type.
    pub fn rated(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    fn decide(&self) -> Decision {
        sample::decide(&*self.sampler, self.rate)
    }

    fn record(&self, name: &str, value: f64) {
        if !self.decide().emits() {
            return;
        }
        let key = recorder::key(name, &self.tags);
        self.source.with_recorder(|r| {
            r.register_histogram(&key, &recorder::metadata())
                .record(value)
        });
    }
}

impl<S: RecorderSource> Client for MetricsRsClient<S> {
    fn count(&self, name: &str, value: i64) {
        if value <= 0 {
            // counters are monotonic
            tracing::debug!(name, value, "dropping non-positive count");
            return;
        }
        let increment = match self.decide() {
            Decision::Always => value as u64,
            Decision::Sampled => (value as f64 / self.rate).round() as u64,
            Decision::Dropped => return,
        };
        let key = recorder::key(name, &self.tags);
        self.source.with_recorder(|r| {
            r.register_counter(&key, &recorder::metadata())
                .increment(increment)
        });
    }

    fn gauge(&self, name: &str, value: f64) {
        if !self.decide().emits() {
            return;
        }
        let key = recorder::key(name, &self.tags);
        self.source
            .with_recorder(|r| r.register_gauge(&key, &recorder::metadata()).set(value));
    }

    fn histogram(&self, name: &str, value: f64) {
        self.record(name, value);
    }

    fn timing(&self, name: &str, value: SignedDuration) {
        self.record(name, value.as_secs_f64());
    }

    fn event(&self, event: &Event) {
        let tags = self.tags.merged(&event.tags);
        tracing::info!(
            target: "tally::event",
            title = %event.title,
            text = %event.text,
            tags = %tags,
            "event"
        );
    }

    fn with_tags(&self, tags: Tags) -> BoxClient {
        Box::new(self.tagged(tags))
    }

    fn with_rate(&self, rate: f64) -> BoxClient {
        Box::new(self.rated(rate))
    }
}
