// src/moodle/request.rs

use std::fmt::Display;

/// A typed request against the Moodle REST web-service surface.
///
/// Every remote function gets its own constructor so call sites cannot pass
/// the wrong parameter shape; serialization follows Moodle's wire rule:
/// scalars are stringified, sequence parameters expand into repeated
/// positionally-indexed bracket keys (`courseids[0]=9`, `courseids[1]=12`).
#[derive(Debug, Clone)]
pub struct WsRequest {
    function: &'static str,
    params: Vec<(String, String)>,
}

impl WsRequest {
    fn new(function: &'static str) -> Self {
        Self {
            function,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    fn array<T: Display>(mut self, key: &str, values: &[T]) -> Self {
        for (idx, value) in values.iter().enumerate() {
            self.params.push((format!("{}[{}]", key, idx), value.to_string()));
        }
        self
    }

    /// `mod_quiz_get_quizzes_by_courses`: quizzes of the given courses,
    /// used to map cmid -> quiz instance id.
    pub fn quizzes_by_courses(course_ids: &[i64]) -> Self {
        Self::new("mod_quiz_get_quizzes_by_courses").array("courseids", course_ids)
    }

    /// `core_course_get_contents`: the course's full section/module tree.
    pub fn course_contents(course_id: i64) -> Self {
        Self::new("core_course_get_contents").param("courseid", course_id)
    }

    /// `core_enrol_get_enrolled_users`: accounts enrolled in the course.
    pub fn enrolled_users(course_id: i64) -> Self {
        Self::new("core_enrol_get_enrolled_users").param("courseid", course_id)
    }

    /// `mod_quiz_get_user_best_grade`: one user's best grade on one quiz.
    pub fn user_best_grade(quiz_id: i64, user_id: i64) -> Self {
        Self::new("mod_quiz_get_user_best_grade")
            .param("quizid", quiz_id)
            .param("userid", user_id)
    }

    /// `gradereport_user_get_grade_items`: the whole course grade report,
    /// every user's grade items in one response.
    pub fn course_grade_items(course_id: i64) -> Self {
        Self::new("gradereport_user_get_grade_items").param("courseid", course_id)
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Flattens the request into form pairs, protocol fields first.
    pub fn into_form(self, token: &str) -> Vec<(String, String)> {
        let mut form = Vec::with_capacity(self.params.len() + 3);
        form.push(("wstoken".to_string(), token.to_string()));
        form.push(("moodlewsrestformat".to_string(), "json".to_string()));
        form.push(("wsfunction".to_string(), self.function.to_string()));
        form.extend(self.params);
        form
    }
}
