//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::rolling::WindowPolicy;
use crate::series::SortKey;

/// Mean of the scores that fell into one window, stamped with the window's end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A single question's score at its resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestionScore {
    pub resolved_at: DateTime<Utc>,
    pub score: f64,
}

/// Rolling average series for one window length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingSeries {
    pub window_days: u32,
    pub points: Vec<AveragedPoint>,
}

/// Latest value of a rolling series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingLatest {
    pub window_days: u32,
    pub value: Option<f64>,
}

/// Headline numbers shown on the console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_questions: usize,
    pub latest_cumulative: Option<f64>,
    pub latest_rolling: Vec<RollingLatest>,
}

/// Complete analysis result for one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub schema_version: u8,
    pub sort_key: SortKey,
    pub policy: WindowPolicy,
    pub summary: Summary,
    pub cumulative: Vec<AveragedPoint>,
    pub rolling: Vec<RollingSeries>,
    pub question_scores: Vec<QuestionScore>,
}
