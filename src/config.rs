// src/config.rs

use std::env;

use url::Url;

use crate::error::AppError;
use crate::models::leaderboard::SubjectConfig;

/// Which Moodle call maps course-module ids to quiz instance ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// `mod_quiz_get_quizzes_by_courses`. Some deployments omit `cmid`
    /// from its response, so this is not the default.
    QuizList,
    /// `core_course_get_contents`, walking the section tree.
    CourseContents,
}

/// How grades are fetched for one quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStrategy {
    /// One `mod_quiz_get_user_best_grade` call per enrolled user.
    PerUser,
    /// One `gradereport_user_get_grade_items` call per subject.
    Bulk,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub moodle_base_url: String,
    pub moodle_ws_token: String,
    pub course_id: i64,
    /// When `None` the leaderboard endpoint is public.
    pub leaderboard_secret: Option<String>,
    pub subjects: Vec<SubjectConfig>,
    pub resolve_strategy: ResolveStrategy,
    pub grade_strategy: GradeStrategy,
    pub rust_log: String,
}

/// The quiz modules tracked by default. The cmids come from the
/// `/mod/quiz/view.php?id=XX` links of the deployed course.
const DEFAULT_SUBJECTS: &str = "Mathematics:40,Physics:41,Chemistry:43,English:44,Biology:45";

impl Config {
    /// Loads and validates configuration from the environment.
    ///
    /// Fails with a `Config` error naming the offending variable instead of
    /// panicking, so startup failures are explicit and request-time code
    /// never reads the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let moodle_base_url = require_env("MOODLE_BASE_URL")?;
        Url::parse(&moodle_base_url)
            .map_err(|e| AppError::Config(format!("MOODLE_BASE_URL is not a valid URL: {}", e)))?;
        // The ws endpoint path is appended later; a trailing slash would
        // produce a double slash in every request URL.
        let moodle_base_url = moodle_base_url.trim_end_matches('/').to_string();

        let moodle_ws_token = require_env("MOODLE_WS_TOKEN")?;

        let course_id = match env::var("MOODLE_COURSE_ID") {
            Ok(v) => v
                .parse::<i64>()
                .map_err(|_| AppError::Config(format!("MOODLE_COURSE_ID is not an integer: {}", v)))?,
            Err(_) => 9,
        };

        let leaderboard_secret = env::var("LEADERBOARD_SECRET").ok().filter(|s| !s.is_empty());

        let subjects_raw =
            env::var("LEADERBOARD_SUBJECTS").unwrap_or_else(|_| DEFAULT_SUBJECTS.to_string());
        let subjects = parse_subjects(&subjects_raw)?;

        let resolve_strategy = match env::var("MOODLE_RESOLVE_STRATEGY").as_deref() {
            Ok("quiz_list") => ResolveStrategy::QuizList,
            Ok("course_contents") | Err(_) => ResolveStrategy::CourseContents,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "MOODLE_RESOLVE_STRATEGY must be quiz_list or course_contents, got: {}",
                    other
                )));
            }
        };

        let grade_strategy = match env::var("MOODLE_GRADE_STRATEGY").as_deref() {
            Ok("per_user") => GradeStrategy::PerUser,
            Ok("bulk") | Err(_) => GradeStrategy::Bulk,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "MOODLE_GRADE_STRATEGY must be per_user or bulk, got: {}",
                    other
                )));
            }
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            moodle_base_url,
            moodle_ws_token,
            course_id,
            leaderboard_secret,
            subjects,
            resolve_strategy,
            grade_strategy,
            rust_log,
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("missing environment variable: {}", name)))
}

/// Parses `Label:cmid,Label:cmid,...` into the ordered subject list.
fn parse_subjects(raw: &str) -> Result<Vec<SubjectConfig>, AppError> {
    let mut subjects = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (label, cmid) = entry.rsplit_once(':').ok_or_else(|| {
            AppError::Config(format!(
                "LEADERBOARD_SUBJECTS entry must be Label:cmid, got: {}",
                entry
            ))
        })?;
        let cmid = cmid.trim().parse::<i64>().map_err(|_| {
            AppError::Config(format!("LEADERBOARD_SUBJECTS cmid is not an integer: {}", entry))
        })?;
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::Config(format!(
                "LEADERBOARD_SUBJECTS entry has an empty label: {}",
                entry
            )));
        }
        subjects.push(SubjectConfig {
            subject: label.to_string(),
            cmid,
        });
    }
    if subjects.is_empty() {
        return Err(AppError::Config(
            "LEADERBOARD_SUBJECTS resolved to an empty list".to_string(),
        ));
    }
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_subjects_parse_in_order() {
        let subjects = parse_subjects(DEFAULT_SUBJECTS).unwrap();
        assert_eq!(subjects.len(), 5);
        assert_eq!(subjects[0].subject, "Mathematics");
        assert_eq!(subjects[0].cmid, 40);
        assert_eq!(subjects[4].subject, "Biology");
        assert_eq!(subjects[4].cmid, 45);
    }

    #[test]
    fn subject_labels_may_contain_spaces() {
        let subjects = parse_subjects("Further Mathematics: 52").unwrap();
        assert_eq!(subjects[0].subject, "Further Mathematics");
        assert_eq!(subjects[0].cmid, 52);
    }

    #[test]
    fn malformed_subject_entry_is_rejected() {
        assert!(parse_subjects("Mathematics").is_err());
        assert!(parse_subjects("Mathematics:forty").is_err());
        assert!(parse_subjects("").is_err());
    }
}
