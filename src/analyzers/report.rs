use crate::analyzers::cumulative::cumulative_average;
use crate::analyzers::rolling::rolling_average;
use crate::analyzers::types::{QuestionScore, RollingLatest, RollingSeries, ScoreReport, Summary};
use crate::config::AnalysisConfig;
use crate::loader::Record;
use crate::series::{OrderedSeries, SortKey};
use tracing::info;

/// Builds the full [`ScoreReport`] for a set of loaded records.
///
/// Orders the records by the configured key, computes the cumulative average
/// and one rolling series per configured window, and lists per-question scores
/// by resolution time.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn build_report(records: &[Record], config: &AnalysisConfig) -> ScoreReport {
    let series = OrderedSeries::build(records, config.sort_key);

    let cumulative = cumulative_average(&series);

    let rolling: Vec<RollingSeries> = config
        .windows_days
        .iter()
        .map(|&window_days| RollingSeries {
            window_days,
            points: rolling_average(&series, window_days, config.policy),
        })
        .collect();

    let question_scores: Vec<QuestionScore> = OrderedSeries::build(records, SortKey::ResolvedAt)
        .records()
        .iter()
        .map(|r| QuestionScore {
            resolved_at: r.resolved_at,
            score: r.score,
        })
        .collect();

    let summary = Summary {
        total_questions: series.len(),
        latest_cumulative: cumulative.last().map(|p| p.value),
        latest_rolling: rolling
            .iter()
            .map(|r| RollingLatest {
                window_days: r.window_days,
                value: r.points.last().map(|p| p.value),
            })
            .collect(),
    };

    info!(
        total_questions = summary.total_questions,
        latest_cumulative = summary.latest_cumulative,
        "Report built"
    );

    ScoreReport {
        schema_version: 1,
        sort_key: config.sort_key,
        policy: config.policy,
        summary,
        cumulative,
        rolling,
        question_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::rolling::WindowPolicy;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn records() -> Vec<Record> {
        vec![
            Record {
                created_at: at(3),
                resolved_at: at(4),
                score: 0.9,
            },
            Record {
                created_at: at(1),
                resolved_at: at(10),
                score: 0.1,
            },
            Record {
                created_at: at(2),
                resolved_at: at(5),
                score: 0.5,
            },
        ]
    }

    #[test]
    fn test_report_by_creation() {
        let config = AnalysisConfig {
            windows_days: vec![2, 30],
            ..Default::default()
        };
        let report = build_report(&records(), &config);

        assert_eq!(report.summary.total_questions, 3);
        assert_eq!(report.cumulative.len(), 3);
        assert_eq!(report.cumulative[0].timestamp, at(1));
        assert!((report.summary.latest_cumulative.unwrap() - 0.5).abs() < 1e-12);

        assert_eq!(report.rolling.len(), 2);
        assert_eq!(report.rolling[0].window_days, 2);
        let latest_two_day = report.summary.latest_rolling[0].value.unwrap();
        assert!((latest_two_day - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_question_scores_follow_resolution_order() {
        let report = build_report(&records(), &AnalysisConfig::default());
        let scores: Vec<f64> = report.question_scores.iter().map(|q| q.score).collect();

        assert_eq!(scores, vec![0.9, 0.5, 0.1]);
    }

    #[test]
    fn test_report_by_resolution_with_daily_policy() {
        let config = AnalysisConfig {
            sort_key: SortKey::ResolvedAt,
            policy: WindowPolicy::FixedDailyStep,
            windows_days: vec![1],
            ..Default::default()
        };
        let report = build_report(&records(), &config);

        assert_eq!(report.cumulative[0].timestamp, at(4));
        assert_eq!(report.policy, WindowPolicy::FixedDailyStep);
        // Resolutions fall exactly on midnight, so each belongs to the window
        // ending at that midnight. The first window ends a day after the first
        // resolution and therefore never sees it.
        let stamps: Vec<_> = report.rolling[0].points.iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![at(5), at(10)]);
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(&[], &AnalysisConfig::default());

        assert_eq!(report.summary.total_questions, 0);
        assert_eq!(report.summary.latest_cumulative, None);
        assert!(report.cumulative.is_empty());
        assert!(report.rolling.iter().all(|r| r.points.is_empty()));
        assert!(report.summary.latest_rolling.iter().all(|r| r.value.is_none()));
    }
}
