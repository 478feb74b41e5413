//! Trailing-window averages over an ordered series.
//!
//! Two window policies are available:
//!
//! | Policy           | Window for a point at `t`  | Points emitted              |
//! |------------------|----------------------------|-----------------------------|
//! | `PerEvent`       | `(t - W, t]`, `t` a record | one per record              |
//! | `FixedDailyStep` | `(end - W, end]`, midnight | at most one per day spanned |
//!
//! Both walk the series with two forward-only cursors, so every record enters
//! and leaves the window at most once, and read each window's mean from prefix
//! sums in constant time. Empty windows never produce a point. A window wider
//! than the representable date range has no lower bound.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzers::types::AveragedPoint;
use crate::analyzers::utility::{prefix_sums, range_mean};
use crate::series::OrderedSeries;

/// How the rolling window advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Re-evaluate the window at every record's own timestamp.
    #[default]
    PerEvent,
    /// Step the window end one day at a time across the data's span.
    FixedDailyStep,
}

/// Rolling average of `series` over a trailing window of `window_days` days.
pub fn rolling_average(
    series: &OrderedSeries,
    window_days: u32,
    policy: WindowPolicy,
) -> Vec<AveragedPoint> {
    let points = match policy {
        WindowPolicy::PerEvent => per_event(series, window_days),
        WindowPolicy::FixedDailyStep => fixed_daily_step(series, window_days),
    };
    debug!(
        window_days,
        ?policy,
        records = series.len(),
        points = points.len(),
        "Rolling average computed"
    );
    points
}

/// Cursor pair delimiting the records inside `(start, end]`.
///
/// Both bounds must be non-decreasing between calls to [`Window::mean`].
struct Window {
    timestamps: Vec<DateTime<Utc>>,
    prefix: Vec<f64>,
    window: Duration,
    lo: usize,
    hi: usize,
}

impl Window {
    fn new(series: &OrderedSeries, window_days: u32) -> Self {
        Self {
            timestamps: series.timestamps().collect(),
            prefix: prefix_sums(series.scores()),
            window: Duration::days(window_days.into()),
            lo: 0,
            hi: 0,
        }
    }

    /// Mean score of the records in `(end - W, end]`, if any.
    fn mean(&mut self, end: DateTime<Utc>) -> Option<f64> {
        let start = end
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        while self.hi < self.timestamps.len() && self.timestamps[self.hi] <= end {
            self.hi += 1;
        }
        while self.lo < self.hi && self.timestamps[self.lo] <= start {
            self.lo += 1;
        }
        range_mean(&self.prefix, self.lo..self.hi)
    }
}

/// One point per record, averaging every record with timestamp in
/// `(t_i - W, t_i]`.
///
/// Records sharing `t_i` all fall inside the window, including those that
/// come after position `i`.
pub fn per_event(series: &OrderedSeries, window_days: u32) -> Vec<AveragedPoint> {
    let mut cursor = Window::new(series, window_days);
    let mut points = Vec::with_capacity(series.len());

    for end in series.timestamps() {
        if let Some(value) = cursor.mean(end) {
            points.push(AveragedPoint {
                timestamp: end,
                value,
            });
        }
    }

    points
}

/// Steps a window end across midnights, from the day after the first record
/// until one day past the last record, averaging records in `(end - W, end]`.
pub fn fixed_daily_step(series: &OrderedSeries, window_days: u32) -> Vec<AveragedPoint> {
    let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) else {
        return Vec::new();
    };

    let day = Duration::days(1);
    let mut cursor = Window::new(series, window_days);
    let mut points = Vec::new();

    let midnight = first.date_naive().and_time(NaiveTime::MIN).and_utc();
    let Some(mut end) = midnight.checked_add_signed(day) else {
        return Vec::new();
    };
    let stop = last
        .checked_add_signed(day)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    while end <= stop {
        if let Some(value) = cursor.mean(end) {
            points.push(AveragedPoint {
                timestamp: end,
                value,
            });
        }
        match end.checked_add_signed(day) {
            Some(next) => end = next,
            None => break,
        }
    }

    points
}
