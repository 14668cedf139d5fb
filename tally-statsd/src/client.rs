// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc, time::Duration};

use tally_core::{
    BoxClient, Client, Event, SignedDuration, Tags,
    sample::{self, Decision, Sampler},
};

use crate::{
    Transport,
    datagram::{EventLine, MetricLine, MetricValue},
    rate_limit::RateLimit,
};

const SEND_ERROR_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// A [`Client`] that sends each operation as a DogStatsD datagram.
///
/// Build one with [`StatsdClientBuilder`](crate::StatsdClientBuilder). Derived clients share the
/// transport, sampler and namespace of their parent.
#[derive(Clone)]
pub struct StatsdClient {
    transport: Arc<dyn Transport>,
    sampler: Arc<dyn Sampler>,
    namespace: Arc<str>,
    rate: f64,
    tags: Tags,
    send_errors: Arc<RateLimit>,
}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsdClient")
            .field("namespace", &self.namespace)
            .field("rate", &self.rate)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl StatsdClient {
    pub(crate) fn from_parts(
        transport: Arc<dyn Transport>,
        sampler: Arc<dyn Sampler>,
        namespace: Arc<str>,
        rate: f64,
        tags: Tags,
    ) -> Self {
        Self {
            transport,
            sampler,
            namespace,
            rate,
            tags,
            send_errors: Arc::new(RateLimit::new(SEND_ERROR_LOG_INTERVAL)),
        }
    }

    /// The sample rate of this client.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The tags of this client, including the constant tags it was built with.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// The prefix prepended to every metric name.
    pub fn namespace(&self) -> &str {
        &self.namespace
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

    fn send_metric(&self, name: &str, value: MetricValue) {
        let rate = match sample::decide(&*self.sampler, self.rate) {
            Decision::Always => None,
            Decision::Sampled => Some(self.rate),
            Decision::Dropped => return,
        };
        let line = MetricLine {
            namespace: &self.namespace,
            name,
            value,
            rate,
            tags: &self.tags,
        };
        self.send(line.to_string());
    }

    fn send(&self, datagram: String) {
        if let Err(err) = self.transport.send(datagram.as_bytes())
            && self.send_errors.allow()
        {
            tracing::warn!(?err, "couldn't send statsd datagram");
        }
    }
}

impl Client for StatsdClient {
    fn count(&self, name: &str, value: i64) {
        self.send_metric(name, MetricValue::Count(value));
    }

    fn gauge(&self, name: &str, value: f64) {
        if !value.is_finite() {
            tracing::debug!(name, value, "dropping non-finite gauge");
            return;
        }
        self.send_metric(name, MetricValue::Gauge(value));
    }

    fn histogram(&self, name: &str, value: f64) {
        if !value.is_finite() {
            tracing::debug!(name, value, "dropping non-finite histogram sample");
            return;
        }
        self.send_metric(name, MetricValue::Histogram(value));
    }

    fn timing(&self, name: &str, value: SignedDuration) {
        self.send_metric(name, MetricValue::Timing(value));
    }

    fn event(&self, event: &Event) {
        let tags = self.tags.merged(&event.tags);
        let line = EventLine {
            event,
            tags: &tags,
        };
        self.send(line.to_string());
    }

    fn with_tags(&self, tags: Tags) -> BoxClient {
        Box::new(self.tagged(tags))
    }

    fn with_rate(&self, rate: f64) -> BoxClient {
        Box::new(self.rated(rate))
    }
}
