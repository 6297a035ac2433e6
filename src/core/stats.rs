//! Running statistics accumulator
//!
//! Online count/sum/mean/variance/min/max over a stream of finite doubles.
//! Observations are folded in with Welford's update and two independent
//! accumulators are merged with Chan's parallel-variance formula, so the
//! accumulator can be filled partition by partition and merged in any order.

use super::combine::Combine;
use crate::error::{ProcMinerError, Result};
use serde::Serialize;

/// Combinable numeric aggregate
///
/// An accumulator with `count == 0` is the identity element: it has no
/// mean, variance, minimum or maximum, and merging with it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "StatsSnapshot")]
pub struct RunningStats {
    count: u64,
    sum: f64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

/// Serializable view of a [`RunningStats`]; undefined values are `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub count: u64,
    pub sum: f64,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub stdev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<RunningStats> for StatsSnapshot {
    fn from(stats: RunningStats) -> Self {
        StatsSnapshot {
            count: stats.count,
            sum: stats.sum,
            mean: stats.mean(),
            variance: stats.variance(),
            stdev: stats.stdev(),
            min: stats.min(),
            max: stats.max(),
        }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::identity()
    }
}

impl RunningStats {
    pub fn identity() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Accumulate every value; fails on the first non-finite one
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut stats = Self::identity();
        for value in values {
            stats.push(value)?;
        }
        Ok(stats)
    }

    /// New accumulator with `value` folded in; `self` is left as is
    pub fn observe(&self, value: f64) -> Result<Self> {
        let mut next = *self;
        next.push(value)?;
        Ok(next)
    }

    /// Fold `value` into this accumulator (Welford's update)
    ///
    /// NaN and infinities are rejected before any field changes.
    pub fn push(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ProcMinerError::non_finite_observation(value));
        }

        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        Ok(())
    }

    /// Chan's parallel combination of two disjoint accumulators
    pub fn merge(&self, other: &RunningStats) -> RunningStats {
        if other.count == 0 {
            return *self;
        }
        if self.count == 0 {
            return *other;
        }

        let count = self.count + other.count;
        let (n_a, n_b, n) = (self.count as f64, other.count as f64, count as f64);
        let delta = other.mean - self.mean;

        RunningStats {
            count,
            sum: self.sum + other.sum,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population variance, `M2 / count`
    pub fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    /// Sample variance, `M2 / (count - 1)`; needs two observations
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn stdev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn sample_stdev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// `max - min`
    pub fn range(&self) -> Option<f64> {
        (self.count > 0).then(|| self.max - self.min)
    }

    /// Exact equality on count/min/max, relative tolerance on sum/mean/variance
    pub fn approx_eq(&self, other: &RunningStats, tolerance: f64) -> bool {
        fn close(a: f64, b: f64, tolerance: f64) -> bool {
            let scale = a.abs().max(b.abs()).max(1.0);
            (a - b).abs() <= tolerance * scale
        }
        fn close_opt(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => close(a, b, tolerance),
                (None, None) => true,
                _ => false,
            }
        }

        self.count == other.count
            && self.min() == other.min()
            && self.max() == other.max()
            && close(self.sum, other.sum, tolerance)
            && close_opt(self.mean(), other.mean(), tolerance)
            && close_opt(self.variance(), other.variance(), tolerance)
    }
}

impl Combine for RunningStats {
    fn identity() -> Self {
        RunningStats::identity()
    }

    fn combine(&self, other: &Self) -> Self {
        self.merge(other)
    }
}
