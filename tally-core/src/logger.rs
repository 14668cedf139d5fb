// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains [`InfoLogger`], the logging capability the logger sink writes its lines to.

use std::{fmt, sync::Arc};

/// Something that accepts formatted informational messages.
///
/// A message, made of a format template and its arguments, goes in and nothing comes back.
/// Implementations must not block the caller indefinitely and must not panic. Delivery failures
/// are never reported to the caller.
///
/// Implementations are shared between many clients (and threads), so they take `&self`.
///
/// ```
/// # use std::fmt;
/// # use tally_core::InfoLogger;
/// struct Stderr;
///
/// impl InfoLogger for Stderr {
///     fn info(&self, message: fmt::Arguments<'_>) {
///         eprintln!("{message}");
///     }
/// }
///
/// Stderr.info(format_args!("Count {}:{} {}", "requests", 1, "map[]"));
/// ```
pub trait InfoLogger: Send + Sync {
    /// Log one message.
    fn info(&self, message: fmt::Arguments<'_>);
}

impl<L: InfoLogger + ?Sized> InfoLogger for Arc<L> {
    fn info(&self, message: fmt::Arguments<'_>) {
        (**self).info(message)
    }
}

impl<L: InfoLogger + ?Sized> InfoLogger for Box<L> {
    fn info(&self, message: fmt::Arguments<'_>) {
        (**self).info(message)
    }
}

impl<L: InfoLogger + ?Sized> InfoLogger for &L {
    fn info(&self, message: fmt::Arguments<'_>) {
        (**self).info(message)
    }
}
