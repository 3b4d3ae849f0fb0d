// src/moodle/grades.rs

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::config::GradeStrategy;
use crate::error::AppError;
use crate::moodle::client::MoodleClient;
use crate::moodle::request::WsRequest;
use crate::moodle::types::{BestGrade, EnrolledUser, GradeRecord, GradeReport};

/// Fetches per-user grades for one quiz.
///
/// Returned records preserve the enumeration order of `users`; ranking
/// relies on that order to break ties deterministically.
#[async_trait]
pub trait GradeSource: Send + Sync {
    async fn grades_for_quiz(
        &self,
        client: &MoodleClient,
        quiz_id: i64,
        users: &[EnrolledUser],
    ) -> Result<Vec<GradeRecord>, AppError>;
}

pub fn grade_source_for(strategy: GradeStrategy, course_id: i64) -> Box<dyn GradeSource> {
    match strategy {
        GradeStrategy::PerUser => Box::new(PerUserGrades),
        GradeStrategy::Bulk => Box::new(BulkGrades { course_id }),
    }
}

/// One `mod_quiz_get_user_best_grade` call per enrolled user, issued
/// concurrently with no ordering guarantee among the calls themselves.
/// Worst case this is subjects x users outbound calls, which is why the
/// bulk source is the default.
pub struct PerUserGrades;

#[async_trait]
impl GradeSource for PerUserGrades {
    async fn grades_for_quiz(
        &self,
        client: &MoodleClient,
        quiz_id: i64,
        users: &[EnrolledUser],
    ) -> Result<Vec<GradeRecord>, AppError> {
        let fetches = users.iter().map(|user| async move {
            let best: BestGrade = client
                .call_as(WsRequest::user_best_grade(quiz_id, user.id))
                .await?;
            Ok::<_, AppError>(GradeRecord {
                userid: user.id,
                grade: best.grade,
            })
        });

        // First failure abandons the remaining in-flight calls; no retries.
        try_join_all(fetches).await
    }
}

/// One `gradereport_user_get_grade_items` call covering every user, filtered
/// to the grade item whose module is "quiz" and whose instance matches.
/// Bounds outbound calls to O(subjects) instead of O(subjects x users).
pub struct BulkGrades {
    pub course_id: i64,
}

#[async_trait]
impl GradeSource for BulkGrades {
    async fn grades_for_quiz(
        &self,
        client: &MoodleClient,
        quiz_id: i64,
        users: &[EnrolledUser],
    ) -> Result<Vec<GradeRecord>, AppError> {
        let report: GradeReport = client
            .call_as(WsRequest::course_grade_items(self.course_id))
            .await?;

        // Index the report by user, then emit records in roster order so
        // tie-breaking stays deterministic across strategies.
        let mut by_user = std::collections::HashMap::new();
        for user_grades in report.usergrades {
            let grade = user_grades
                .gradeitems
                .iter()
                .find(|item| {
                    item.itemmodule.as_deref() == Some("quiz")
                        && item.iteminstance == Some(quiz_id)
                })
                .and_then(|item| item.graderaw);
            by_user.insert(user_grades.userid, grade);
        }

        Ok(users
            .iter()
            .map(|user| GradeRecord {
                userid: user.id,
                grade: by_user.get(&user.id).copied().flatten(),
            })
            .collect())
    }
}
