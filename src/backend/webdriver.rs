//! WebDriver protocol adapter
//!
//! Binds the [`AutomationSession`] capability to a WebDriver-compatible
//! automation server over HTTP. One POST creates the session with the fixed
//! device capability set; every element operation is a JSON request against
//! `/session/{id}/...`; DELETE ends the session.

use crate::backend::{AutomationSession, BackendError, ElementRef, Locator};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// W3C element identifier key in wire responses
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy (JSON wire protocol) element identifier key, still sent by some
/// mobile automation servers
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// A live WebDriver session against the automation server
pub struct WebDriverSession {
    http: Client,
    base: String,
    session_id: String,
}

impl WebDriverSession {
    /// Establishes a session with the automation server
    ///
    /// Sends the fixed capability set from the backend configuration. Any
    /// failure here is a [`BackendError::Connection`], which the caller
    /// treats as fatal.
    pub async fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let base = config.endpoint.trim_end_matches('/').to_string();
        let payload = capabilities_payload(config);

        let response = http
            .post(format!("{base}/session"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Connection(wire_error_message(&body)));
        }

        let session_id = body
            .pointer("/value/sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BackendError::Connection("session response carried no sessionId".to_string())
            })?
            .to_string();

        tracing::info!("Automation session established: {}", session_id);

        Ok(Self {
            http,
            base,
            session_id,
        })
    }

    /// The server-assigned session id
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base, self.session_id, path)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(decode_wire_error(status, &body))
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, BackendError> {
        self.execute(self.http.post(self.url(path)).json(&body)).await
    }

    async fn get(&self, path: &str) -> Result<Value, BackendError> {
        self.execute(self.http.get(self.url(path))).await
    }

    fn locator_payload(locator: &Locator) -> Value {
        json!({ "using": locator.strategy(), "value": locator.value() })
    }
}

#[async_trait]
impl AutomationSession for WebDriverSession {
    async fn enter_search_text(&self, locator: &Locator, text: &str) -> Result<(), BackendError> {
        let field = self.find_one(locator).await?;
        self.click(&field).await?;
        self.post(&format!("/element/{}/clear", field.id), json!({}))
            .await?;
        self.post(
            &format!("/element/{}/value", field.id),
            json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BackendError> {
        let body = self
            .post("/elements", Self::locator_payload(locator))
            .await?;
        let entries = body
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| BackendError::Protocol("elements response was not a list".to_string()))?;
        entries
            .iter()
            .map(|entry| {
                extract_element(entry).ok_or_else(|| {
                    BackendError::Protocol("element entry carried no identifier".to_string())
                })
            })
            .collect()
    }

    async fn find_one(&self, locator: &Locator) -> Result<ElementRef, BackendError> {
        let body = self.post("/element", Self::locator_payload(locator)).await?;
        body.get("value")
            .and_then(extract_element)
            .ok_or_else(|| BackendError::NotFound(locator.to_string()))
    }

    async fn click(&self, element: &ElementRef) -> Result<(), BackendError> {
        self.post(&format!("/element/{}/click", element.id), json!({}))
            .await?;
        Ok(())
    }

    async fn element_text(&self, element: &ElementRef) -> Result<String, BackendError> {
        let body = self.get(&format!("/element/{}/text", element.id)).await?;
        body.get("value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BackendError::Protocol("text response was not a string".to_string()))
    }

    async fn navigate_back(&self) -> Result<(), BackendError> {
        self.post("/back", json!({})).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.execute(
            self.http
                .delete(format!("{}/session/{}", self.base, self.session_id)),
        )
        .await?;
        Ok(())
    }
}

/// Builds the new-session payload from the backend configuration
fn capabilities_payload(config: &BackendConfig) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": {
                "platformName": config.platform_name,
                "appium:platformVersion": config.platform_version,
                "appium:deviceName": config.device_name,
                "appium:automationName": config.automation_name,
                "appium:noReset": config.no_reset,
                "appium:newCommandTimeout": config.new_command_timeout,
            }
        }
    })
}

/// Maps a wire-level error payload onto the backend error taxonomy
fn decode_wire_error(status: StatusCode, body: &Value) -> BackendError {
    let error = body
        .pointer("/value/error")
        .and_then(Value::as_str)
        .unwrap_or("");
    let message = wire_error_message(body);

    match error {
        "no such element" | "stale element reference" => BackendError::NotFound(message),
        "invalid session id" | "session not created" => BackendError::Session(message),
        _ => BackendError::Protocol(format!("HTTP {status}: {message}")),
    }
}

fn wire_error_message(body: &Value) -> String {
    body.pointer("/value/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

fn extract_element(entry: &Value) -> Option<ElementRef> {
    let id = entry
        .get(W3C_ELEMENT_KEY)
        .or_else(|| entry.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)?;
    Some(ElementRef { id: id.to_string() })
}
