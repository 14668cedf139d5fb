// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc};

use tally_core::{
    BoxClient, Client, DisplayDuration, DisplayFloat, Event, InfoLogger, MetricKind,
    SignedDuration, Tags,
    sample::{self, Decision, Sampler, ThreadRngSampler},
};

use crate::StdoutLogger;

/// A [`Client`] that writes every metric operation as a line to an [`InfoLogger`].
///
/// Scoping with [`Client::with_tags`] or [`Client::with_rate`] clones the client: the logger and
/// sampler are shared, the tags and rate belong to the new client alone.
///
/// ```
/// # use tally_core::{Client, Event, Tags};
/// # use tally_core::test_util::RecordingLogger;
/// # use tally_logger::LoggerClient;
/// let recorder = RecordingLogger::new();
/// let client = LoggerClient::with_logger(recorder.clone());
///
/// client.with_tags(Tags::from([("tag1", "value1")])).incr("requests.count");
/// client.event(&Event::new("title", "desc"));
/// client.decr("one");
///
/// assert_eq!(
///     recorder.messages(),
///     [
///         "Count requests.count:1 map[tag1:value1]",
///         "Event title\ndesc map[]",
///         "Count one:-1 map[]",
///     ]
/// );
/// ```
#[derive(Clone)]
pub struct LoggerClient {
    logger: Arc<dyn InfoLogger>,
    sampler: Arc<dyn Sampler>,
    rate: f64,
    tags: Tags,
}

impl fmt::Debug for LoggerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerClient")
            .field("rate", &self.rate)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl Default for LoggerClient {
    /// A client writing to standard output.
    fn default() -> Self {
        Self::new(None)
    }
}

impl LoggerClient {
    /// Create a new client writing to `logger`, or to a [`StdoutLogger`] if `logger` is `None`.
    ///
    /// The client starts with a sample rate of `1.0` and no tags.
    pub fn new(logger: Option<Arc<dyn InfoLogger>>) -> Self {
        Self {
            logger: logger.unwrap_or_else(|| Arc::new(StdoutLogger::new())),
            sampler: Arc::new(ThreadRngSampler::new()),
            rate: 1.0,
            tags: Tags::new(),
        }
    }

    /// Create a new client writing to `logger`.
    pub fn with_logger(logger: impl InfoLogger + 'static) -> Self {
        Self::new(Some(Arc::new(logger)))
    }

    /// Replace the source of random draws used for sampling.
    ///
    /// Clients derived from this one share the sampler.
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
            logger: Arc::clone(&self.logger),
            sampler: Arc::clone(&self.sampler),
            rate: self.rate,
            tags: self.tags.merged(&tags),
        }
    }

    /// Like [`Client::with_rate`], but returns the concrete type.
    pub fn rated(&self, rate: f64) -> Self {
        Self {
            logger: Arc::clone(&self.logger),
            sampler: Arc::clone(&self.sampler),
            rate,
            tags: self.tags.clone(),
        }
    }

    /// Render one metric operation, taking the sample rate into account.
    ///
    /// `scaled` is the value adjusted for the rate, for the kinds where that is meaningful.
    fn print(&self, kind: MetricKind, name: &str, value: &dyn fmt::Display, scaled: Option<f64>) {
        let tags = &self.tags;
        match sample::decide(&*self.sampler, self.rate) {
            Decision::Always => self.logger.info(format_args!("{kind} {name}:{value} {tags}")),
            Decision::Dropped => {}
            Decision::Sampled => {
                let rate = DisplayFloat(self.rate);
                match scaled {
                    Some(scaled) => self.logger.info(format_args!(
                        "{kind} {name}:{} ({value} * {rate}) {tags}",
                        DisplayFloat(scaled)
                    )),
                    None => self
                        .logger
                        .info(format_args!("{kind} {name}:{value} ({rate}) {tags}")),
                }
            }
        }
    }
}

impl Client for LoggerClient {
    fn count(&self, name: &str, value: i64) {
        self.print(
            MetricKind::Count,
            name,
            &value,
            Some(value as f64 * self.rate),
        );
    }

    fn gauge(&self, name: &str, value: f64) {
        self.print(MetricKind::Gauge, name, &DisplayFloat(value), None);
    }

    fn histogram(&self, name: &str, value: f64) {
        self.print(MetricKind::Histogram, name, &DisplayFloat(value), None);
    }

    fn timing(&self, name: &str, value: SignedDuration) {
        self.print(MetricKind::Timing, name, &DisplayDuration(value), None);
    }

    fn event(&self, event: &Event) {
        self.logger.info(format_args!(
            "Event {}\n{} {}",
            event.title, event.text, self.tags
        ));
    }

    fn with_tags(&self, tags: Tags) -> BoxClient {
        Box::new(self.tagged(tags))
    }

    fn with_rate(&self, rate: f64) -> BoxClient {
        Box::new(self.rated(rate))
    }
}
