// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains the [`Client`] trait, the operation set every metrics sink supports.

use std::{fmt, sync::Arc, time::Instant};

use jiff::SignedDuration;

use crate::{Event, Tags};

/// A type-erased [`Client`], returned by the scoping operations so they can be chained regardless of
/// the concrete sink.
pub type BoxClient = Box<dyn Client>;

/// The operations any metrics sink must support.
///
/// Metric operations are fire-and-forget: they never return errors and never fail the caller. A
/// delivery problem in the underlying sink is the sink's concern.
///
/// Scoping operations ([`Client::with_tags`], [`Client::with_rate`]) never mutate the receiver. They
/// return a new, independent client which shares only the (immutable) delivery capability with its
/// parent, so it is safe to derive and use scoped clients concurrently.
///
/// ```
/// # use tally_core::{Client, NoopClient, SignedDuration, Tags};
/// fn handle_request(metrics: &dyn Client) {
///     let metrics = metrics.with_tags(Tags::from([("route", "/health")]));
///     metrics.incr("requests.count");
///     metrics.timing("requests.latency", SignedDuration::from_millis(12));
/// }
///
/// handle_request(&NoopClient::new());
/// ```
pub trait Client: Send + Sync {
    /// Add the signed `value` to the counter `name`.
    fn count(&self, name: &str, value: i64);

    /// Add one to the counter `name`. Equivalent to `count(name, 1)`.
    fn incr(&self, name: &str) {
        self.count(name, 1)
    }

    /// Subtract one from the counter `name`. Equivalent to `count(name, -1)`.
    fn decr(&self, name: &str) {
        self.count(name, -1)
    }

    /// Set the gauge `name` to an absolute `value`.
    fn gauge(&self, name: &str, value: f64);

    /// Record `value` into the distribution `name`.
    fn histogram(&self, name: &str, value: f64);

    /// Record an elapsed time sample for `name`.
    fn timing(&self, name: &str, value: SignedDuration);

    /// Record a discrete occurrence.
    fn event(&self, event: &Event);

    /// Return a new client whose tags are the tags of `self` merged with `tags`. Values in `tags`
    /// win on key collisions.
    fn with_tags(&self, tags: Tags) -> BoxClient;

    /// Return a new client with the same tags and sink but with sample rate `rate`.
    ///
    /// A rate in `(0, 1)` emits roughly that fraction of the metric operations. A rate of exactly
    /// `1.0` emits everything without sampling. Rates are not validated, see [`sample::decide`]
    /// for the behavior outside of `(0, 1]`.
    ///
    /// [`sample::decide`]: crate::sample::decide
    fn with_rate(&self, rate: f64) -> BoxClient;

    /// Box this client into a [`BoxClient`].
    fn boxed(self) -> BoxClient
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

macro_rules! forward_client {
    () => {
        fn count(&self, name: &str, value: i64) {
            (**self).count(name, value)
        }

        fn incr(&self, name: &str) {
            (**self).incr(name)
        }

        fn decr(&self, name: &str) {
            (**self).decr(name)
        }

        fn gauge(&self, name: &str, value: f64) {
            (**self).gauge(name, value)
        }

        fn histogram(&self, name: &str, value: f64) {
            (**self).histogram(name, value)
        }

        fn timing(&self, name: &str, value: SignedDuration) {
            (**self).timing(name, value)
        }

        fn event(&self, event: &Event) {
            (**self).event(event)
        }

        fn with_tags(&self, tags: Tags) -> BoxClient {
            (**self).with_tags(tags)
        }

        fn with_rate(&self, rate: f64) -> BoxClient {
            (**self).with_rate(rate)
        }
    };
}

impl<C: Client + ?Sized> Client for Box<C> {
    forward_client!();
}

impl<C: Client + ?Sized> Client for Arc<C> {
    forward_client!();
}

impl<C: Client + ?Sized> Client for &C {
    forward_client!();
}

/// Extension methods available on every [`Client`].
pub trait ClientExt: Client {
    /// Like [`Client::timing`], but takes a [`std::time::Duration`].
    ///
    /// Durations that do not fit into a [`SignedDuration`] are saturated.
    fn timing_std(&self, name: &str, value: std::time::Duration) {
        let value = SignedDuration::try_from(value).unwrap_or(SignedDuration::MAX);
        self.timing(name, value)
    }

    /// Run `f` and record the time it took as a timing named `name`.
    ///
    /// ```
    /// # use tally_core::{ClientExt, NoopClient};
    /// let sum = NoopClient::new().time("compute.sum", || (1..=10).sum::<u32>());
    /// assert_eq!(sum, 55);
    /// ```
    fn time<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.timing_std(name, start.elapsed());
        result
    }
}

impl<C: Client + ?Sized> ClientExt for C {}

/// The kind of a numeric metric operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// [`Client::count`], [`Client::incr`], [`Client::decr`]
    Count,
    /// [`Client::gauge`]
    Gauge,
    /// [`Client::histogram`]
    Histogram,
    /// [`Client::timing`]
    Timing,
}

impl MetricKind {
    /// The label used when rendering the metric for humans, e.g. `Count`.
    pub const fn label(self) -> &'static str {
        match self {
            MetricKind::Count => "Count",
            MetricKind::Gauge => "Gauge",
            MetricKind::Histogram => "Histogram",
            MetricKind::Timing => "Timing",
        }
    }

    /// True if emitting this kind at a sample rate should rescale the emitted value.
    ///
    /// Only counters carry a delta that is meaningful to scale. Gauges, histograms and timings
    /// record the observed value as-is and only annotate the rate.
    pub const fn scales_with_rate(self) -> bool {
        matches!(self, MetricKind::Count)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A [`Client`] that discards everything.
///
/// Useful for tests, or as a default when no metrics sink is configured.
#[derive(Copy, Clone, Debug, Default)]
#[non_exhaustive]
pub struct NoopClient;

impl NoopClient {
    /// Return a new [`NoopClient`]
    pub const fn new() -> Self {
        NoopClient
    }
}

impl Client for NoopClient {
    fn count(&self, _name: &str, _value: i64) {}

    fn gauge(&self, _name: &str, _value: f64) {}

    fn histogram(&self, _name: &str, _value: f64) {}

    fn timing(&self, _name: &str, _value: SignedDuration) {}

    fn event(&self, _event: &Event) {}

    fn with_tags(&self, _tags: Tags) -> BoxClient {
        Box::new(NoopClient)
    }

    fn with_rate(&self, _rate: f64) -> BoxClient {
        Box::new(NoopClient)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert2::check;
    use jiff::SignedDuration;

    use super::*;

    /// Records calls as strings, and records the tags/rate it was scoped with.
    #[derive(Clone, Default)]
    struct CallLog {
        calls: Arc<Mutex<Vec<String>>>,
        tags: Tags,
        rate: Option<f64>,
    }

    impl CallLog {
        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Client for CallLog {
        fn count(&self, name: &str, value: i64) {
            self.push(format!("count {name} {value} {} {:?}", self.tags, self.rate));
        }

        fn gauge(&self, name: &str, value: f64) {
            self.push(format!("gauge {name} {value}"));
        }

        fn histogram(&self, name: &str, value: f64) {
            self.push(format!("histogram {name} {value}"));
        }

        fn timing(&self, name: &str, value: SignedDuration) {
            self.push(format!("timing {name} {}", value.as_nanos()));
        }

        fn event(&self, event: &Event) {
            self.push(format!("event {}", event.title));
        }

        fn with_tags(&self, tags: Tags) -> BoxClient {
            Box::new(CallLog {
                tags: self.tags.merged(&tags),
                ..self.clone()
            })
        }

        fn with_rate(&self, rate: f64) -> BoxClient {
            Box::new(CallLog {
                rate: Some(rate),
                ..self.clone()
            })
        }
    }

    #[test]
    fn incr_and_decr_are_counts() {
        let log = CallLog::default();
        log.incr("a");
        log.decr("a");
        log.count("a", 1);
        log.count("a", -1);
        let calls = log.calls();
        check!(calls[0] == calls[2]);
        check!(calls[1] == calls[3]);
        check!(calls[0] == "count a 1 map[] None");
        check!(calls[1] == "count a -1 map[] None");
    }

    #[test]
    fn box_arc_and_ref_forward() {
        let log = CallLog::default();
        let boxed: BoxClient = log.clone().boxed();
        let arc = Arc::new(log.clone());
        let by_ref: &dyn Client = &log;

        boxed.gauge("g", 1.5);
        arc.histogram("h", 2.0);
        by_ref.timing("t", SignedDuration::from_secs(1));
        boxed.event(&Event::new("title", "text"));

        check!(
            log.calls()
                == vec![
                    "gauge g 1.5".to_string(),
                    "histogram h 2".to_string(),
                    "timing t 1000000000".to_string(),
                    "event title".to_string(),
                ]
        );
    }

    #[test]
    fn scoping_through_box_keeps_chaining() {
        let log = CallLog::default();
        let scoped = log
            .with_tags(Tags::from([("a", "1")]))
            .with_rate(0.5)
            .with_tags(Tags::from([("a", "2"), ("b", "3")]));
        scoped.incr("x");
        log.incr("y");
        check!(
            log.calls()
                == vec![
                    "count x 1 map[a:2 b:3] Some(0.5)".to_string(),
                    "count y 1 map[] None".to_string(),
                ]
        );
    }

    #[test]
    fn time_records_a_timing() {
        let log = CallLog::default();
        let value = log.time("work", || 42);
        check!(value == 42);
        let calls = log.calls();
        check!(calls.len() == 1);
        check!(calls[0].starts_with("timing work "));
    }

    #[test]
    fn timing_std_saturates() {
        let log = CallLog::default();
        log.timing_std("huge", std::time::Duration::MAX);
        check!(log.calls()[0] == format!("timing huge {}", SignedDuration::MAX.as_nanos()));
    }

    #[test]
    fn noop_client_swallows_everything() {
        let client = NoopClient::new();
        client.incr("a");
        client.event(&Event::new("t", "d"));
        let scoped = client.with_tags(Tags::from([("k", "v")])).with_rate(0.0);
        scoped.gauge("g", 1.0);
    }

    #[test]
    fn metric_kind_labels() {
        check!(MetricKind::Count.to_string() == "Count");
        check!(MetricKind::Gauge.label() == "Gauge");
        check!(MetricKind::Histogram.label() == "Histogram");
        check!(MetricKind::Timing.label() == "Timing");
        check!(MetricKind::Count.scales_with_rate());
        check!(!MetricKind::Timing.scales_with_rate());
    }
}
