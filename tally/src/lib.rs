// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tally_core::{
    AlertType, BoxClient, Client, ClientExt, Event, InfoLogger, MetricKind, NoopClient, Priority,
    SignedDuration, Tags,
};

pub use tally_core::{format, sample, tags};

#[cfg(feature = "logger")]
#[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
pub use tally_logger::{LoggerClient, StdoutLogger, TracingLogger};

/// DogStatsD client
#[cfg(feature = "statsd")]
#[cfg_attr(docsrs, doc(cfg(feature = "statsd")))]
pub mod statsd {
    pub use tally_statsd::datagram;
    pub use tally_statsd::{BuildError, StatsdClient, StatsdClientBuilder, Transport, UdpTransport};
}

/// metrics.rs client
#[cfg(feature = "metrics-rs-024")]
#[cfg_attr(docsrs, doc(cfg(feature = "metrics-rs-024")))]
pub mod metrics_rs {
    pub use tally_metricsrs::{GlobalRecorder, LocalRecorder, MetricsRsClient, RecorderSource};
}

/// Utilities for testing code that emits metrics
#[cfg(feature = "test-util")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod test_util {
    pub use tally_core::test_util::RecordingLogger;

    #[cfg(feature = "statsd")]
    pub use tally_statsd::test_util::MemoryTransport;
}
