// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod client;
pub mod datagram;
mod rate_limit;
mod transport;

#[cfg(feature = "test-util")]
pub mod test_util;

pub use builder::{BuildError, StatsdClientBuilder};
pub use client::StatsdClient;
pub use transport::{Transport, UdpTransport};
