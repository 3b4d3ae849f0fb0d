// src/moodle/roster.rs

use serde_json::Value;

use crate::error::AppError;
use crate::moodle::client::MoodleClient;
use crate::moodle::request::WsRequest;
use crate::moodle::types::EnrolledUser;

/// Fetches the course roster, keeping only real accounts.
///
/// Ids <= 1 are Moodle's reserved guest/service accounts and never appear
/// in any aggregation. Malformed entries are skipped. A failed fetch is
/// fatal to the whole leaderboard computation.
pub async fn fetch_roster(
    client: &MoodleClient,
    course_id: i64,
) -> Result<Vec<EnrolledUser>, AppError> {
    let response = client.call(WsRequest::enrolled_users(course_id)).await?;

    let Value::Array(entries) = response else {
        return Err(AppError::remote(
            "moodle ws core_enrol_get_enrolled_users",
            "expected an array of users",
        ));
    };

    let users: Vec<EnrolledUser> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<EnrolledUser>(entry).ok())
        .filter(|u| u.id > 1)
        .collect();

    tracing::debug!(course_id, enrolled = users.len(), "fetched roster");
    Ok(users)
}
