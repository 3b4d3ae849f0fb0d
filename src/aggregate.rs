// src/aggregate.rs

use std::collections::{HashMap, HashSet};

use futures::future::join_all;

use crate::models::leaderboard::{
    LeaderboardRow, SubjectConfig, SubjectResult, UNRESOLVED_QUIZ_ID,
};
use crate::moodle::client::MoodleClient;
use crate::moodle::grades::GradeSource;
use crate::moodle::types::{EnrolledUser, GradeRecord};

/// Hard cap on rows per subject. Also why rank letters never pass 'J'.
const TOP_N: usize = 10;

/// Anonymized display name for a 0-based rank position: "Student A",
/// "Student B", ... Valid for positions below 26; callers stay within
/// `TOP_N`.
fn anon_name(position: usize) -> String {
    format!("Student {}", (b'A' + position as u8) as char)
}

/// Rounds to one decimal, half up at the tenths digit.
fn round_to_tenth(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Folds raw grade records into the ranked, anonymized rows for one subject.
///
/// Keeps only records with a numeric grade whose user is in the allowed
/// (enrolled, non-service) set; sorts by grade descending with ties kept in
/// enumeration order; truncates to the top 10.
pub fn rank_rows(
    subject: &str,
    grades: Vec<GradeRecord>,
    allowed_ids: &HashSet<i64>,
) -> Vec<LeaderboardRow> {
    let mut graded: Vec<(i64, f64)> = grades
        .into_iter()
        .filter(|record| allowed_ids.contains(&record.userid))
        .filter_map(|record| record.grade.map(|g| (record.userid, g)))
        .filter(|(_, grade)| grade.is_finite())
        .collect();

    // sort_by is stable, so equal scores keep their input order and the
    // ranking is identical across requests.
    graded.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    graded.truncate(TOP_N);

    graded
        .into_iter()
        .enumerate()
        .map(|(position, (_userid, grade))| LeaderboardRow {
            rank: position as u32 + 1,
            name: anon_name(position),
            subject: subject.to_string(),
            score: round_to_tenth(grade),
        })
        .collect()
}

/// Computes one subject's result.
///
/// An unresolved cmid or a subject-local upstream failure yields an empty
/// result with a note instead of an error; one broken subject must not take
/// down the whole leaderboard.
pub async fn aggregate_subject(
    client: &MoodleClient,
    grade_source: &dyn GradeSource,
    subject: &SubjectConfig,
    quiz_ids: &HashMap<i64, i64>,
    roster: &[EnrolledUser],
    allowed_ids: &HashSet<i64>,
) -> SubjectResult {
    let Some(&quiz_id) = quiz_ids.get(&subject.cmid) else {
        tracing::warn!(
            subject = %subject.subject,
            cmid = subject.cmid,
            "cmid did not resolve to a quiz; emitting empty result"
        );
        return SubjectResult {
            subject: subject.subject.clone(),
            quizid: UNRESOLVED_QUIZ_ID,
            top: Vec::new(),
            note: Some(format!("cmid {} did not resolve to a quiz", subject.cmid)),
        };
    };

    match grade_source.grades_for_quiz(client, quiz_id, roster).await {
        Ok(grades) => SubjectResult {
            subject: subject.subject.clone(),
            quizid: quiz_id,
            top: rank_rows(&subject.subject, grades, allowed_ids),
            note: None,
        },
        Err(err) => {
            tracing::warn!(
                subject = %subject.subject,
                quizid = quiz_id,
                error = %err,
                "grade fetch failed; emitting empty result"
            );
            SubjectResult {
                subject: subject.subject.clone(),
                quizid: quiz_id,
                top: Vec::new(),
                note: Some("grade fetch failed".to_string()),
            }
        }
    }
}

/// Runs every configured subject's aggregation concurrently.
///
/// Subjects share only read-only inputs, so unordered concurrent execution
/// is safe; results come back in configured subject order regardless.
pub async fn aggregate_all(
    client: &MoodleClient,
    grade_source: &dyn GradeSource,
    subjects: &[SubjectConfig],
    quiz_ids: &HashMap<i64, i64>,
    roster: &[EnrolledUser],
) -> Vec<SubjectResult> {
    let allowed_ids: HashSet<i64> = roster.iter().map(|u| u.id).collect();

    let per_subject = subjects.iter().map(|subject| {
        aggregate_subject(client, grade_source, subject, quiz_ids, roster, &allowed_ids)
    });

    join_all(per_subject).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(userid: i64, grade: Option<f64>) -> GradeRecord {
        GradeRecord { userid, grade }
    }

    fn allowed(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn ranks_descending_with_stable_ties() {
        // Two tied students keep enumeration order.
        let rows = rank_rows(
            "Mathematics",
            vec![
                record(2, Some(85.333_333)),
                record(3, Some(85.333_333)),
                record(5, Some(40.0)),
            ],
            &allowed(&[2, 3, 5]),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "Student A");
        assert_eq!(rows[0].score, 85.3);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].name, "Student B");
        assert_eq!(rows[1].score, 85.3);
        assert_eq!(rows[2].rank, 3);
        assert_eq!(rows[2].name, "Student C");
        assert_eq!(rows[2].score, 40.0);
        assert!(rows.iter().all(|r| r.subject == "Mathematics"));
    }

    #[test]
    fn truncates_to_ten_rows_named_a_through_j() {
        let grades: Vec<GradeRecord> =
            (2..20).map(|id| record(id, Some(100.0 - id as f64))).collect();
        let ids: Vec<i64> = (2..20).collect();

        let rows = rank_rows("Physics", grades, &allowed(&ids));

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].name, "Student A");
        assert_eq!(rows[9].name, "Student J");
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
        for pair in rows.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn excludes_unattempted_and_unenrolled_users() {
        let rows = rank_rows(
            "Chemistry",
            vec![
                record(2, Some(70.0)),
                record(3, None),          // never attempted
                record(99, Some(95.0)),   // not on the roster
            ],
            &allowed(&[2, 3]),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 70.0);
    }

    #[test]
    fn rounds_half_up_at_tenths() {
        // 62.25 is exactly representable, so this pins the tie behavior.
        let rows = rank_rows("English", vec![record(2, Some(62.25))], &allowed(&[2]));
        assert_eq!(rows[0].score, 62.3);

        let rows = rank_rows("English", vec![record(2, Some(62.24))], &allowed(&[2]));
        assert_eq!(rows[0].score, 62.2);
    }

    #[test]
    fn empty_grades_yield_empty_rows() {
        let rows = rank_rows("Biology", Vec::new(), &allowed(&[2, 3]));
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn aggregation_always_yields_one_result_per_subject() {
        // No upstream needed: unresolved subjects never reach the client,
        // and the aggregation as a whole cannot fail.
        let config = crate::config::Config {
            moodle_base_url: "http://127.0.0.1:1".to_string(),
            moodle_ws_token: "unused".to_string(),
            course_id: 9,
            leaderboard_secret: None,
            subjects: Vec::new(),
            resolve_strategy: crate::config::ResolveStrategy::CourseContents,
            grade_strategy: crate::config::GradeStrategy::Bulk,
            rust_log: "error".to_string(),
        };
        let client = MoodleClient::new(&config).unwrap();
        let source = crate::moodle::grades::grade_source_for(config.grade_strategy, 9);
        let subjects = vec![
            SubjectConfig {
                subject: "Mathematics".to_string(),
                cmid: 40,
            },
            SubjectConfig {
                subject: "Physics".to_string(),
                cmid: 41,
            },
        ];

        let results =
            aggregate_all(&client, source.as_ref(), &subjects, &HashMap::new(), &[]).await;

        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.quizid, UNRESOLVED_QUIZ_ID);
            assert!(result.top.is_empty());
        }
    }
}
