// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod recorder;

pub use client::MetricsRsClient;
pub use recorder::{GlobalRecorder, LocalRecorder, RecorderSource};
