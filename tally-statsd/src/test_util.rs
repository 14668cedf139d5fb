// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for checking the datagrams an application sends.

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::Transport;

/// A [`Transport`] that keeps every datagram in memory.
///
/// Clones share the same storage, so keep a clone to inspect what a client sent:
///
/// ```
/// # use tally_core::Client;
/// # use tally_statsd::{StatsdClientBuilder, test_util::MemoryTransport};
/// let transport = MemoryTransport::new();
/// let client = StatsdClientBuilder::new().build_with_transport(transport.clone());
/// client.gauge("memory", 1024.0);
/// assert_eq!(transport.datagrams(), ["memory:1024|g"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    datagrams: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.datagrams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All datagrams sent so far.
    pub fn datagrams(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Take all datagrams sent so far, leaving the transport empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }
}

impl Transport for MemoryTransport {
    fn send(&self, datagram: &[u8]) -> io::Result<()> {
        let datagram = String::from_utf8(datagram.to_vec())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.lock().push(datagram);
        Ok(())
    }
}
