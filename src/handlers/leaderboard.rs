// src/handlers/leaderboard.rs

use axum::{Json, extract::State, http::header, response::IntoResponse};
use chrono::Utc;

use crate::{
    aggregate,
    error::AppError,
    models::leaderboard::LeaderboardSnapshot,
    moodle::{grades, resolver, resolver::QuizResolver as _, roster},
    state::AppState,
};

/// Edge-cache hint for the success response. A performance knob, not a
/// correctness requirement.
const CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=300";

/// Builds the anonymized leaderboard from live Moodle data.
///
/// * Resolves cmid -> quiz id and fetches the roster concurrently; either
///   failing aborts the request (shared setup).
/// * Aggregates every configured subject concurrently; subject-local
///   failures become empty results, not errors.
/// * Returns a freshly timestamped snapshot; nothing is persisted.
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let config = &state.config;
    let quiz_resolver = resolver::resolver_for(config.resolve_strategy);

    let (quiz_ids, users) = tokio::try_join!(
        quiz_resolver.resolve(&state.moodle, config.course_id),
        roster::fetch_roster(&state.moodle, config.course_id),
    )?;

    let grade_source = grades::grade_source_for(config.grade_strategy, config.course_id);

    let results_by_quiz = aggregate::aggregate_all(
        &state.moodle,
        grade_source.as_ref(),
        &config.subjects,
        &quiz_ids,
        &users,
    )
    .await;

    let snapshot = LeaderboardSnapshot {
        generated_at: Utc::now(),
        results_by_quiz,
    };

    tracing::info!(
        subjects = snapshot.results_by_quiz.len(),
        enrolled = users.len(),
        "leaderboard built"
    );

    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(snapshot)))
}
