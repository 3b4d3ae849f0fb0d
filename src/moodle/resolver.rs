// src/moodle/resolver.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ResolveStrategy;
use crate::error::AppError;
use crate::moodle::client::MoodleClient;
use crate::moodle::request::WsRequest;
use crate::moodle::types::{CourseModule, CourseSection, QuizEntry};

/// Maps course-module ids (cmid, the number in `/mod/quiz/view.php?id=XX`)
/// to the quiz instance ids the grade API requires.
///
/// Implementations must never fail merely because some entries are
/// non-quizzes or malformed; those are skipped and the mapping may be
/// partial or empty. A failed upstream call does propagate.
#[async_trait]
pub trait QuizResolver: Send + Sync {
    async fn resolve(
        &self,
        client: &MoodleClient,
        course_id: i64,
    ) -> Result<HashMap<i64, i64>, AppError>;
}

pub fn resolver_for(strategy: ResolveStrategy) -> Box<dyn QuizResolver> {
    match strategy {
        ResolveStrategy::QuizList => Box::new(QuizListResolver),
        ResolveStrategy::CourseContents => Box::new(CourseContentsResolver),
    }
}

/// Strategy (a): `mod_quiz_get_quizzes_by_courses`, matching entries that
/// expose both a cmid and an instance id.
pub struct QuizListResolver;

#[async_trait]
impl QuizResolver for QuizListResolver {
    async fn resolve(
        &self,
        client: &MoodleClient,
        course_id: i64,
    ) -> Result<HashMap<i64, i64>, AppError> {
        let response = client.call(WsRequest::quizzes_by_courses(&[course_id])).await?;

        // The response shape varies by site/version: commonly
        // {"quizzes": [...]} but sometimes [{"id": course, "quizzes": [...]}].
        let quizzes = response
            .get("quizzes")
            .or_else(|| response.get(0).and_then(|c| c.get("quizzes")))
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));

        let mut mapping = HashMap::new();
        if let Value::Array(entries) = quizzes {
            for entry in entries {
                let Ok(quiz) = serde_json::from_value::<QuizEntry>(entry) else {
                    continue;
                };
                if let Some(cmid) = quiz.cmid {
                    mapping.insert(cmid, quiz.id);
                }
            }
        }

        tracing::debug!(course_id, quizzes = mapping.len(), "resolved via quiz list");
        Ok(mapping)
    }
}

/// Strategy (b): walk `core_course_get_contents`, taking every module whose
/// `modname` is "quiz". More robust than the quiz list because the content
/// tree always carries both the cmid (the node's own id) and the instance.
pub struct CourseContentsResolver;

#[async_trait]
impl QuizResolver for CourseContentsResolver {
    async fn resolve(
        &self,
        client: &MoodleClient,
        course_id: i64,
    ) -> Result<HashMap<i64, i64>, AppError> {
        let sections: Vec<CourseSection> =
            client.call_as(WsRequest::course_contents(course_id)).await?;

        let mut mapping = HashMap::new();
        for section in sections {
            for module in section.modules {
                let Ok(module) = serde_json::from_value::<CourseModule>(module) else {
                    continue;
                };
                if module.modname != "quiz" {
                    continue;
                }
                if let Some(instance) = module.instance {
                    mapping.insert(module.id, instance);
                }
            }
        }

        tracing::debug!(course_id, quizzes = mapping.len(), "resolved via course contents");
        Ok(mapping)
    }
}
