//! Output formatting and persistence for score reports.
//!
//! Supports a console summary, JSON serialization, and a long-format CSV of
//! every series for plotting elsewhere.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::ScoreReport;

/// Renders the headline numbers, one line each.
///
/// Averages are omitted when the report holds no questions.
pub fn render_summary(report: &ScoreReport) -> String {
    let summary = &report.summary;
    let mut lines = vec![format!("resolved questions: {}", summary.total_questions)];

    if let Some(latest) = summary.latest_cumulative {
        lines.push(format!("total average (latest): {latest:.2}"));
    }

    for rolling in &summary.latest_rolling {
        if let Some(latest) = rolling.value {
            lines.push(format!(
                "{}-day rolling average (latest): {latest:.2}",
                rolling.window_days
            ));
        }
    }

    lines.join("\n")
}

/// Writes the report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ScoreReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path:?}"))?;
    serde_json::to_writer_pretty(file, report).context("failed to serialize report")?;
    info!(path = %path.display(), "JSON report written");
    Ok(())
}

#[derive(Serialize)]
struct SeriesRow<'a> {
    series: &'a str,
    timestamp: DateTime<Utc>,
    value: f64,
}

/// Writes every series as `series,timestamp,value` rows.
///
/// Series are named `cumulative`, `rolling_<W>d` and `question_score`.
pub fn write_series_csv(path: &Path, report: &ScoreReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path:?}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    let mut rows = 0usize;

    for point in &report.cumulative {
        writer.serialize(SeriesRow {
            series: "cumulative",
            timestamp: point.timestamp,
            value: point.value,
        })?;
        rows += 1;
    }

    for rolling in &report.rolling {
        let name = format!("rolling_{}d", rolling.window_days);
        for point in &rolling.points {
            writer.serialize(SeriesRow {
                series: &name,
                timestamp: point.timestamp,
                value: point.value,
            })?;
            rows += 1;
        }
    }

    for question in &report.question_scores {
        writer.serialize(SeriesRow {
            series: "question_score",
            timestamp: question.resolved_at,
            value: question.score,
        })?;
        rows += 1;
    }

    writer.flush()?;
    debug!(path = %path.display(), rows, "Series CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::report::build_report;
    use crate::config::AnalysisConfig;
    use crate::loader::Record;
    use chrono::{Duration, TimeZone};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn report() -> ScoreReport {
        let origin = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let records: Vec<Record> = [0.1, 0.5, 0.9]
            .iter()
            .enumerate()
            .map(|(i, &score)| Record {
                created_at: origin + Duration::days(i as i64 + 1),
                resolved_at: origin + Duration::days(i as i64 + 2),
                score,
            })
            .collect();
        let config = AnalysisConfig {
            windows_days: vec![2],
            ..Default::default()
        };
        build_report(&records, &config)
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&report());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "resolved questions: 3",
                "total average (latest): 0.50",
                "2-day rolling average (latest): 0.70",
            ]
        );
    }

    #[test]
    fn test_render_empty_summary() {
        let empty = build_report(&[], &AnalysisConfig::default());
        assert_eq!(render_summary(&empty), "resolved questions: 0");
    }

    #[test]
    fn test_write_json() {
        let path = temp_path("brier_trend_test_report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &report()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_questions"], 3);
        assert_eq!(value["policy"], "per_event");
        assert_eq!(value["cumulative"].as_array().unwrap().len(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_series_csv() {
        let path = temp_path("brier_trend_test_series.csv");
        let _ = fs::remove_file(&path);

        write_series_csv(&path, &report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 3 cumulative + 3 rolling + 3 question scores
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "series,timestamp,value");
        assert!(lines[4].starts_with("rolling_2d,"));
        assert!(lines[9].starts_with("question_score,"));

        fs::remove_file(&path).unwrap();
    }
}
