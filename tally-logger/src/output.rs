// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt,
    io::{self, Write as _},
};

use tally_core::InfoLogger;

/// Writes every message as an unprefixed line to standard output.
///
/// This is the logger a [`LoggerClient`](crate::LoggerClient) uses when none is supplied.
#[derive(Copy, Clone, Debug, Default)]
#[non_exhaustive]
pub struct StdoutLogger;

impl StdoutLogger {
    /// Return a new [`StdoutLogger`]
    pub const fn new() -> Self {
        StdoutLogger
    }
}

impl InfoLogger for StdoutLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        // stdout going away must not fail the instrumented operation
        let _ = writeln!(io::stdout().lock(), "{message}");
    }
}

/// Forwards every message to `tracing` as an `INFO` event with target `tally`.
///
/// This lets metric lines share the application's log pipeline, including its filtering.
///
/// ```
/// # use tally_core::Client;
/// # use tally_logger::{LoggerClient, TracingLogger};
/// let client = LoggerClient::with_logger(TracingLogger::new());
/// client.incr("requests.count");
/// ```
#[derive(Copy, Clone, Debug, Default)]
#[non_exhaustive]
pub struct TracingLogger;

impl TracingLogger {
    /// Return a new [`TracingLogger`]
    pub const fn new() -> Self {
        TracingLogger
    }
}

impl InfoLogger for TracingLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        tracing::info!(target: "tally", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tally_core::InfoLogger;

    use super::{StdoutLogger, TracingLogger};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn tracing_logger_emits_info_events() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingLogger::new().info(format_args!("Count {}:{} {}", "one", 1, "map[]"));
        });

        let output = buf.contents();
        assert!(output.contains("INFO"), "{output}");
        assert!(output.contains("tally"), "{output}");
        assert!(output.contains("Count one:1 map[]"), "{output}");
    }

    #[test]
    fn stdout_logger_does_not_panic() {
        StdoutLogger::new().info(format_args!("Gauge {}:{} {}", "memory", 1024, "map[]"));
    }
}
