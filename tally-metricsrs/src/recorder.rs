// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use metrics_024::{Key, Label, Level, Metadata, Recorder};
use tally_core::Tags;

/// Where a [`MetricsRsClient`](crate::MetricsRsClient) finds its recorder.
///
/// Implemented by [`GlobalRecorder`] and [`LocalRecorder`].
pub trait RecorderSource: Send + Sync + 'static {
    /// Run `f` with the recorder.
    fn with_recorder<T>(&self, f: impl FnOnce(&dyn Recorder) -> T) -> T;
}

/// Uses the thread's local recorder if one is set, or else the global recorder.
///
/// Operations are no-ops when neither is installed.
#[derive(Debug, Copy, Clone, Default)]
#[non_exhaustive]
pub struct GlobalRecorder;

impl RecorderSource for GlobalRecorder {
    fn with_recorder<T>(&self, f: impl FnOnce(&dyn Recorder) -> T) -> T {
        metrics_024::with_recorder(f)
    }
}

/// Uses a specific recorder owned by the client.
#[derive(Debug, Copy, Clone)]
pub struct LocalRecorder<R>(pub R);

impl<R: Recorder + Send + Sync + 'static> RecorderSource for LocalRecorder<R> {
    fn with_recorder<T>(&self, f: impl FnOnce(&dyn Recorder) -> T) -> T {
        f(&self.0)
    }
}

pub(crate) fn key(name: &str, tags: &Tags) -> Key {
    let labels: Vec<Label> = tags
        .iter()
        .map(|(k, v)| Label::new(k.to_owned(), v.to_owned()))
        .collect();
    Key::from_parts(name.to_owned(), labels)
}

pub(crate) fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}
