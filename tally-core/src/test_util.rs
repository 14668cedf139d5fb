// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Utilities for testing code that emits metrics.
//!
//! This requires that the `test-util` feature be enabled.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::InfoLogger;

/// An [`InfoLogger`] that records every message in memory.
///
/// Cloning will provide another reference to the same underlying buffer, so you can hand one clone
/// to a client and inspect the other.
///
/// ```
/// # use tally_core::{InfoLogger, test_util::RecordingLogger};
/// let recorder = RecordingLogger::new();
/// recorder.info(format_args!("Count {}:{}", "one", 1));
/// assert_eq!(recorder.messages(), ["Count one:1"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingLogger(Arc<Mutex<Vec<String>>>);

impl RecordingLogger {
    /// Create a new, empty [`RecordingLogger`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of every message recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drain all recorded messages, returning them.
    ///
    /// The logger can still be used afterwards.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of messages recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Return the most recent message.
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InfoLogger for RecordingLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        self.lock().push(message.to_string());
    }
}
