use std::ops::Range;

/// Running totals of `values`, with a leading zero: `prefix[i]` is the sum of
/// `values[..i]`.
pub fn prefix_sums(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sum = 0.0;
    std::iter::once(0.0)
        .chain(values.into_iter().map(|v| {
            sum += v;
            sum
        }))
        .collect()
}

/// Mean of `values[range]` from its prefix sums. Returns `None` for an empty range.
pub fn range_mean(prefix: &[f64], range: Range<usize>) -> Option<f64> {
    if range.is_empty() {
        return None;
    }
    Some((prefix[range.end] - prefix[range.start]) / range.len() as f64)
}
