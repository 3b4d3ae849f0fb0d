// src/moodle/types.rs

use serde::Deserialize;

/// Entry of `mod_quiz_get_quizzes_by_courses`. Only `id` is guaranteed;
/// some deployments omit `cmid`, which is why the quiz-list resolve
/// strategy is not the default.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizEntry {
    pub id: i64,
    #[serde(default)]
    pub cmid: Option<i64>,
}

/// Section of `core_course_get_contents`.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseSection {
    #[serde(default)]
    pub modules: Vec<serde_json::Value>,
}

/// Module node within a course section. `id` is the course-module id
/// (cmid); `instance` is the activity instance id — for quizzes, exactly
/// the quiz id the grade API requires.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseModule {
    pub id: i64,
    pub modname: String,
    #[serde(default)]
    pub instance: Option<i64>,
}

/// Account from `core_enrol_get_enrolled_users`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrolledUser {
    pub id: i64,
    #[serde(default)]
    pub fullname: Option<String>,
}

/// Response of `mod_quiz_get_user_best_grade`. `grade` is absent when the
/// user has not attempted the quiz.
#[derive(Debug, Clone, Deserialize)]
pub struct BestGrade {
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Response of `gradereport_user_get_grade_items`.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeReport {
    #[serde(default)]
    pub usergrades: Vec<UserGradeItems>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserGradeItems {
    pub userid: i64,
    #[serde(default)]
    pub gradeitems: Vec<GradeItem>,
}

/// One row of a user's grade report. `itemmodule`/`iteminstance` identify
/// the activity; `graderaw` is absent when the item was never attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeItem {
    #[serde(default)]
    pub itemmodule: Option<String>,
    #[serde(default)]
    pub iteminstance: Option<i64>,
    #[serde(default)]
    pub graderaw: Option<f64>,
}

/// A user's grade for one quiz. `grade == None` means not yet attempted
/// and must be excluded from ranking, never treated as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub userid: i64,
    pub grade: Option<f64>,
}
