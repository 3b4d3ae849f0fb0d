use crate::config::Config;
use crate::moodle::MoodleClient;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub moodle: MoodleClient,
    pub config: Config,
}

impl FromRef<AppState> for MoodleClient {
    fn from_ref(state: &AppState) -> Self {
        state.moodle.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
