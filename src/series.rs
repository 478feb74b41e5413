//! Time ordering of loaded records.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::loader::Record;

/// Which timestamp of a [`Record`] orders a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    ResolvedAt,
}

impl Record {
    pub fn timestamp(&self, key: SortKey) -> DateTime<Utc> {
        match key {
            SortKey::CreatedAt => self.created_at,
            SortKey::ResolvedAt => self.resolved_at,
        }
    }
}

/// Records sorted ascending by one of their timestamps.
///
/// Equal timestamps keep their input order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSeries {
    key: SortKey,
    records: Vec<Record>,
}

impl OrderedSeries {
    pub fn build(records: &[Record], key: SortKey) -> Self {
        let mut records = records.to_vec();
        // `sort_by_key` is stable.
        records.sort_by_key(|r| r.timestamp(key));
        Self { key, records }
    }

    pub fn key(&self) -> SortKey {
        self.key
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sort-key timestamp of the record at `idx`.
    pub fn timestamp_at(&self, idx: usize) -> DateTime<Utc> {
        self.records[idx].timestamp(self.key)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.records.iter().map(|r| r.timestamp(self.key))
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.score)
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.first().map(|r| r.timestamp(self.key))
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.timestamp(self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn record(created: i64, resolved: i64, score: f64) -> Record {
        Record {
            created_at: at(created),
            resolved_at: at(resolved),
            score,
        }
    }

    #[test]
    fn test_sort_by_creation() {
        let records = vec![record(3, 4, 0.3), record(1, 9, 0.1), record(2, 5, 0.2)];
        let series = OrderedSeries::build(&records, SortKey::CreatedAt);

        let scores: Vec<f64> = series.scores().collect();
        assert_eq!(scores, vec![0.1, 0.2, 0.3]);
        assert_eq!(series.first_timestamp(), Some(at(1)));
        assert_eq!(series.last_timestamp(), Some(at(3)));
    }

    #[test]
    fn test_sort_by_resolution() {
        let records = vec![record(3, 4, 0.3), record(1, 9, 0.1), record(2, 5, 0.2)];
        let series = OrderedSeries::build(&records, SortKey::ResolvedAt);

        let scores: Vec<f64> = series.scores().collect();
        assert_eq!(scores, vec![0.3, 0.2, 0.1]);
        assert_eq!(series.timestamp_at(2), at(9));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![record(2, 2, 0.5), record(1, 1, 0.9), record(2, 2, 0.1)];
        let series = OrderedSeries::build(&records, SortKey::CreatedAt);

        let scores: Vec<f64> = series.scores().collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.1]);
    }

    #[test]
    fn test_two_views_over_same_records() {
        let records = vec![record(1, 5, 0.1), record(2, 3, 0.2)];
        let by_created = OrderedSeries::build(&records, SortKey::CreatedAt);
        let by_resolved = OrderedSeries::build(&records, SortKey::ResolvedAt);

        assert_eq!(by_created.records()[0].score, 0.1);
        assert_eq!(by_resolved.records()[0].score, 0.2);
        assert_eq!(records[0].score, 0.1);
    }

    #[test]
    fn test_empty() {
        let series = OrderedSeries::build(&[], SortKey::CreatedAt);
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);
    }
}
