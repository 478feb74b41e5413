use crate::analyzers::types::AveragedPoint;
use crate::series::OrderedSeries;

/// Running mean of the series' scores, one point per record.
///
/// The `i`-th point is stamped with the `i`-th record's sort-key timestamp
/// and holds the mean of records `0..=i`. An empty series yields no points.
pub fn cumulative_average(series: &OrderedSeries) -> Vec<AveragedPoint> {
    let mut sum = 0.0;

    series
        .timestamps()
        .zip(series.scores())
        .enumerate()
        .map(|(i, (timestamp, score))| {
            sum += score;
            AveragedPoint {
                timestamp,
                value: sum / (i + 1) as f64,
            }
        })
        .collect()
}
