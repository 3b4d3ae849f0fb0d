// src/moodle/client.rs

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, truncate};
use crate::moodle::request::WsRequest;

/// Path of the single REST-RPC endpoint every ws function goes through.
const WS_ENDPOINT: &str = "/webservice/rest/server.php";

/// Per-call timeout. The per-user grade strategy can issue
/// subjects x enrolled-users calls, so unbounded calls would let one slow
/// upstream stall the whole request.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for Moodle's REST web-service protocol.
///
/// Each call is a form-encoded POST carrying the ws token, the desired
/// response format, the function name, and function parameters. Calls are
/// never retried; a failure surfaces as `AppError::Remote`.
#[derive(Clone)]
pub struct MoodleClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl MoodleClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(CALL_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.moodle_base_url, WS_ENDPOINT),
            token: config.moodle_ws_token.clone(),
        })
    }

    /// Invokes one ws function and returns the decoded JSON body.
    ///
    /// Fails when the transport fails, the status is not 2xx, the body is
    /// not JSON, or the body carries Moodle's `exception` envelope (bad
    /// token, missing capability, unknown function, ...).
    pub async fn call(&self, request: WsRequest) -> Result<Value, AppError> {
        let function = request.function();
        let form = request.into_form(&self.token);

        tracing::debug!(function, "calling moodle ws");

        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("moodle ws {}: {}", function, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Remote(format!("moodle ws {}: {}", function, e)))?;

        // Moodle often returns JSON even on errors, but not always.
        let json: Value = serde_json::from_str(&body).map_err(|_| {
            AppError::remote(&format!("moodle ws {} HTTP {}", function, status.as_u16()), &body)
        })?;

        if !status.is_success() {
            return Err(AppError::remote(
                &format!("moodle ws {} HTTP {}", function, status.as_u16()),
                &json.to_string(),
            ));
        }

        if json.get("exception").is_some() {
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| json.get("errorcode").and_then(Value::as_str))
                .unwrap_or("moodle ws exception");
            return Err(AppError::Remote(format!(
                "moodle ws {}: {}",
                function,
                truncate(message, 300)
            )));
        }

        Ok(json)
    }

    /// `call` plus deserialization into a typed response.
    pub async fn call_as<T: DeserializeOwned>(&self, request: WsRequest) -> Result<T, AppError> {
        let json = self.call(request).await?;
        Ok(serde_json::from_value(json)?)
    }
}
