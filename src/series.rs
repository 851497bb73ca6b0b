//! Fixed-interval time series.

use anyhow::{Result, ensure};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Values sampled at a fixed interval from a start timestamp.
///
/// Sample `i` is stamped `start + i * interval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub start: NaiveDateTime,
    /// Sampling interval in minutes.
    pub interval_minutes: i64,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(start: NaiveDateTime, interval_minutes: i64, values: Vec<f64>) -> Result<Self> {
        ensure!(interval_minutes > 0, "time series interval must be positive");
        Ok(Self {
            start,
            interval_minutes,
            values,
        })
    }

    /// Hourly series.
    pub fn hourly(start: NaiveDateTime, values: Vec<f64>) -> Self {
        Self {
            start,
            interval_minutes: 60,
            values,
        }
    }

    /// Hourly all-zero series covering one year.
    pub fn zero_year(start: NaiveDateTime) -> Self {
        Self::hourly(start, vec![0.0; HOURS_PER_YEAR])
    }

    /// Single-value series, the shape a steady-state run produces.
    pub fn single(start: NaiveDateTime, value: f64) -> Self {
        Self::hourly(start, vec![value])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_hourly(&self) -> bool {
        self.interval_minutes == 60
    }

    pub fn value(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    pub fn timestamp(&self, i: usize) -> NaiveDateTime {
        self.start + Duration::minutes(self.interval_minutes * i as i64)
    }

    /// `(timestamp, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.timestamp(i), v))
    }

    /// Element-wise sum with a series of the same shape.
    pub fn add_assign(&mut self, other: &TimeSeries) -> Result<()> {
        ensure!(
            self.len() == other.len() && self.interval_minutes == other.interval_minutes,
            "cannot add series of shape {}x{}min to {}x{}min",
            other.len(),
            other.interval_minutes,
            self.len(),
            self.interval_minutes
        );
        for (a, b) in self.values.iter_mut().zip(&other.values) {
            *a += b;
        }
        Ok(())
    }
}
