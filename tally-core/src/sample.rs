// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains the sampling primitives shared by every sink.
//!
//! A client with a sample rate below `1.0` only emits a random fraction of the metric operations
//! it receives. Every sink makes that decision through [`decide`], so the same rate means the same
//! thing whichever sink is behind a [`Client`].
//!
//! Random draws come from a [`Sampler`]:
//!
//! 1. [`ThreadRngSampler`], the default, which draws from the thread-local generator and takes no
//!    locks.
//! 2. [`SeededSampler`], which wraps any [`RngCore`] (for example a seeded `ChaCha8Rng`) to make
//!    sampling reproducible in tests.
//! 3. [`ConstSampler`], which always returns the same draw.
//!
//! [`Client`]: crate::Client

use std::{fmt, sync::Arc, sync::Mutex};

use rand::{Rng, RngCore};

/// A source of uniform random draws in `[0, 1)`.
pub trait Sampler: Send + Sync {
    /// Draw a uniform float in `[0, 1)`.
    fn draw(&self) -> f64;
}

impl<S: Sampler + ?Sized> Sampler for Arc<S> {
    fn draw(&self) -> f64 {
        (**self).draw()
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn draw(&self) -> f64 {
        (**self).draw()
    }
}

/// The outcome of a sampling decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The rate is exactly `1.0`: emit without sampling. No random draw was made.
    Always,
    /// The draw fell under the rate: emit, and account for the rate.
    Sampled,
    /// The draw did not fall under the rate: emit nothing.
    Dropped,
}

impl Decision {
    /// True unless the decision is [`Decision::Dropped`].
    pub fn emits(self) -> bool {
        !matches!(self, Decision::Dropped)
    }
}

/// Decide whether a metric operation at `rate` should be emitted.
///
/// A rate of exactly `1.0` is [`Decision::Always`] without drawing. Any other rate draws once from
/// `sampler` and emits when `draw < rate`. Rates are not validated, so this comparison defines the
/// behavior at the edges:
///
/// - `rate <= 0.0` (and `NaN`) never emits.
/// - `rate > 1.0` always emits, as [`Decision::Sampled`].
///
/// ```
/// # use tally_core::sample::{ConstSampler, Decision, decide};
/// assert_eq!(decide(&ConstSampler(0.99), 1.0), Decision::Always);
/// assert_eq!(decide(&ConstSampler(0.2), 0.5), Decision::Sampled);
/// assert_eq!(decide(&ConstSampler(0.5), 0.5), Decision::Dropped);
/// assert_eq!(decide(&ConstSampler(0.0), 0.0), Decision::Dropped);
/// assert_eq!(decide(&ConstSampler(0.99), 2.0), Decision::Sampled);
/// ```
pub fn decide(sampler: &(impl Sampler + ?Sized), rate: f64) -> Decision {
    if rate == 1.0 {
        return Decision::Always;
    }
    if sampler.draw() < rate {
        Decision::Sampled
    } else {
        Decision::Dropped
    }
}

/// Draws from [`rand::rng()`], the thread-local generator.
///
/// This is the default [`Sampler`] of every client.
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct ThreadRngSampler;

impl ThreadRngSampler {
    /// Return a new [`ThreadRngSampler`]
    pub const fn new() -> Self {
        ThreadRngSampler
    }
}

impl Sampler for ThreadRngSampler {
    fn draw(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Draws from an owned random number generator.
///
/// The generator is behind a mutex since clients sample through `&self`. Use this when sampling
/// has to be reproducible, for example with a seeded `rand_chacha::ChaCha8Rng` in tests.
pub struct SeededSampler<R>(Mutex<R>);

impl<R> SeededSampler<R> {
    /// Create a [`SeededSampler`] drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self(Mutex::new(rng))
    }
}

impl<R> fmt::Debug for SeededSampler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SeededSampler").finish()
    }
}

impl<R: RngCore + Send> Sampler for SeededSampler<R> {
    fn draw(&self) -> f64 {
        // a panic while drawing can't leave the generator in a bad state
        let mut rng = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random::<f64>()
    }
}

/// Always returns the same draw.
///
/// `ConstSampler(0.0)` emits at every rate above zero, `ConstSampler(0.999)` drops at almost every
/// rate below one. Mostly useful to force a sampling branch in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstSampler(pub f64);

impl Sampler for ConstSampler {
    fn draw(&self) -> f64 {
        self.0
    }
}
