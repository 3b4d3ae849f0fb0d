// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};

/// One tracked quiz: a display label plus the course-module id (cmid) taken
/// from the quiz's `/mod/quiz/view.php?id=XX` link. The cmid is NOT the quiz
/// instance id the grade API wants; see `moodle::resolver`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfig {
    pub subject: String,
    pub cmid: i64,
}

/// A single anonymized leaderboard entry.
///
/// `name` is derived purely from rank position ("Student A", "Student B", …)
/// and never from the real account. This is the privacy boundary of the
/// public leaderboard, not a cosmetic choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: u32,
    pub name: String,
    pub subject: String,
    /// Rounded to one decimal place.
    pub score: f64,
}

/// Sentinel quiz id for subjects whose cmid did not resolve.
pub const UNRESOLVED_QUIZ_ID: i64 = -1;

/// Ranked results for one configured subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResult {
    pub subject: String,
    /// Resolved quiz instance id, or `UNRESOLVED_QUIZ_ID`.
    pub quizid: i64,
    /// At most 10 rows, highest score first.
    pub top: Vec<LeaderboardRow>,
    /// Diagnostic for empty results (unresolved cmid, upstream failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The full aggregation result for one request. Immutable once built;
/// recomputed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub results_by_quiz: Vec<SubjectResult>,
}
