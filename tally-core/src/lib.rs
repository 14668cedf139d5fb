// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use crate::client::{BoxClient, Client, ClientExt, MetricKind, NoopClient};
pub use crate::event::{AlertType, Event, Priority};
pub use crate::format::{DisplayDuration, DisplayFloat};
pub use crate::logger::InfoLogger;
pub use crate::sample::{Decision, Sampler};
pub use crate::tags::Tags;

pub use jiff::SignedDuration;

pub mod client;
pub mod event;
pub mod format;
pub mod logger;
pub mod sample;
pub mod tags;

#[cfg(feature = "test-util")]
pub mod test_util;
