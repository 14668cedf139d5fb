// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, io, net::ToSocketAddrs, sync::Arc};

use tally_core::{
    Tags,
    sample::{Sampler, ThreadRngSampler},
};

use crate::{StatsdClient, Transport, UdpTransport};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8125;

const AGENT_HOST_VAR: &str = "DD_AGENT_HOST";
const AGENT_PORT_VAR: &str = "DD_DOGSTATSD_PORT";

/// Unified service tagging variables and the constant tag each one becomes.
const SERVICE_TAG_VARS: [(&str, &str); 3] = [
    ("DD_ENV", "env"),
    ("DD_SERVICE", "service"),
    ("DD_VERSION", "version"),
];

/// Error returned by [`StatsdClientBuilder::build`].
#[derive(Debug)]
#[non_exhaustive]
pub enum BuildError {
    /// Creating or connecting the socket failed.
    Io(io::Error),
    /// The agent address could not be resolved.
    InvalidAddress(String),
    /// The configured agent port is not a valid port number.
    InvalidPort(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Io(err) => write!(f, "failed to set up statsd socket: {err}"),
            BuildError::InvalidAddress(addr) => write!(f, "invalid statsd address: {addr}"),
            BuildError::InvalidPort(port) => write!(f, "invalid statsd port: {port:?}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BuildError {
    fn from(err: io::Error) -> Self {
        BuildError::Io(err)
    }
}

/// Builder for [`StatsdClient`].
///
/// ```no_run
/// # use tally_core::Tags;
/// # use tally_statsd::StatsdClientBuilder;
/// // agent address and unified service tags from DD_* variables
/// let client = StatsdClientBuilder::from_env()
///     .namespace("myapp.")
///     .rate(0.5)
///     .build()?;
/// # Ok::<(), tally_statsd::BuildError>(())
/// ```
pub struct StatsdClientBuilder {
    host: String,
    port: u16,
    namespace: String,
    constant_tags: Tags,
    rate: f64,
    sampler: Arc<dyn Sampler>,
    // reported by `build`, so that env lookup itself stays infallible
    deferred: Option<BuildError>,
}

impl fmt::Debug for StatsdClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsdClientBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("namespace", &self.namespace)
            .field("constant_tags", &self.constant_tags)
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

impl Default for StatsdClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsdClientBuilder {
    /// A builder targeting `127.0.0.1:8125` with no namespace, no constant tags and rate `1.0`.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            namespace: String::new(),
            constant_tags: Tags::new(),
            rate: 1.0,
            sampler: Arc::new(ThreadRngSampler::new()),
            deferred: None,
        }
    }

    /// A builder configured from the process environment. See [`Self::from_lookup`].
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// A builder configured through `lookup`:
    ///
    /// - `DD_AGENT_HOST` and `DD_DOGSTATSD_PORT` set the agent address. Unset or empty values keep
    ///   the defaults. A port that does not parse makes [`Self::build`] fail.
    /// - `DD_ENV`, `DD_SERVICE` and `DD_VERSION` become the constant tags `env`, `service` and
    ///   `version` when set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut builder = Self::new();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.is_empty());
        if let Some(host) = non_empty(AGENT_HOST_VAR) {
            builder.host = host;
        }
        if let Some(port) = non_empty(AGENT_PORT_VAR) {
            match port.trim().parse() {
                Ok(port) => builder.port = port,
                Err(_) => builder.deferred = Some(BuildError::InvalidPort(port)),
            }
        }
        for (var, tag) in SERVICE_TAG_VARS {
            if let Some(value) = non_empty(var) {
                builder.constant_tags.insert(tag, value);
            }
        }
        builder
    }

    /// Set the agent address.
    pub fn addr(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        if matches!(self.deferred, Some(BuildError::InvalidPort(_))) {
            self.deferred = None;
        }
        self
    }

    /// Set a prefix prepended verbatim to every metric name, e.g. `"myapp."`.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add tags sent with every datagram. Tags added to a client later win on key collisions.
    pub fn constant_tags(mut self, tags: Tags) -> Self {
        self.constant_tags.extend(tags);
        self
    }

    /// Set the initial sample rate.
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Replace the source of random draws used for sampling.
    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    /// Connect a [`UdpTransport`] to the configured agent address and build the client.
    pub fn build(mut self) -> Result<StatsdClient, BuildError> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let peer = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|err| {
                BuildError::InvalidAddress(format!("{}:{}: {err}", self.host, self.port))
            })?
            .next()
            .ok_or_else(|| BuildError::InvalidAddress(format!("{}:{}", self.host, self.port)))?;
        let transport = UdpTransport::connect(peer)?;
        tracing::debug!(%peer, "connected statsd transport");
        Ok(self.finish(Arc::new(transport)))
    }

    /// Build a client sending through `transport`. The configured address is ignored.
    pub fn build_with_transport(self, transport: impl Transport + 'static) -> StatsdClient {
        self.finish(Arc::new(transport))
    }

    fn finish(self, transport: Arc<dyn Transport>) -> StatsdClient {
        StatsdClient::from_parts(
            transport,
            self.sampler,
            self.namespace.into(),
            self.rate,
            self.constant_tags,
        )
    }
}
