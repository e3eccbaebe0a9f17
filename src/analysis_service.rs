//! Client for the external analysis service.
//!
//! The service owns every model-driven computation (regional chronic
//! disease reports, per-patient reports, the assistant chat). This crate
//! only forwards requests and passes results through.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::AnalysisConfig;
use crate::error::{FetchError, FetchErrorKind};
use crate::models::{ChronicDiseaseAnalysis, PatientAnalysis};

/// Assistant option sent when the caller picks none.
pub const DEFAULT_CHAT_OPTION: &str = "A";
/// Image URL placeholder for text-only questions.
pub const NO_IMAGE: &str = "NA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(rename = "conversationsNew", default)]
    pub conversation: Vec<ChatTurn>,
    #[serde(default = "default_option")]
    pub option: String,
    #[serde(default = "default_image")]
    pub imgurl: String,
}

fn default_option() -> String {
    DEFAULT_CHAT_OPTION.to_string()
}

fn default_image() -> String {
    NO_IMAGE.to_string()
}

impl ChatRequest {
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            conversation: Vec::new(),
            option: default_option(),
            imgurl: default_image(),
        }
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.question.trim().is_empty() {
            return Err(FetchError::validation("Question must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

fn require(what: &str, value: &str) -> Result<(), FetchError> {
    if value.trim().is_empty() {
        return Err(FetchError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Operations delegated to the analysis service. Implementations block.
pub trait AnalysisService: Send + Sync {
    /// Generate a chronic disease report for the region.
    fn chronic_disease(&self, region_id: &str) -> Result<ChronicDiseaseAnalysis, FetchError>;

    /// Generate the report for one patient visit.
    fn patient_analysis(&self, visit_patient_id: &str) -> Result<PatientAnalysis, FetchError>;

    /// Free-form regional summary.
    fn community_health(&self, region_id: &str) -> Result<Value, FetchError>;

    /// Forward a question to the assistant. Empty questions fail before any
    /// request is made.
    fn chat(&self, request: &ChatRequest) -> Result<ChatReply, FetchError>;
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP implementation
// ═══════════════════════════════════════════════════════════════════════════

pub struct HttpAnalysisService {
    base_url: String,
    timeout_secs: u64,
}

impl HttpAnalysisService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(&config.base_url, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| FetchError::service(format!("HTTP client error: {e}")))?;

        tracing::info!(path, "Calling analysis service");

        let response = client.post(&url).json(body).send().map_err(|e| {
            if e.is_connect() {
                FetchError::new(
                    FetchErrorKind::Network,
                    format!("Cannot connect to analysis service at {}", self.base_url),
                )
            } else if e.is_timeout() {
                FetchError::new(
                    FetchErrorKind::Network,
                    format!("Request timed out after {}s", self.timeout_secs),
                )
            } else {
                FetchError::new(FetchErrorKind::Network, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(path, status = status.as_u16(), "Analysis service error");
            return Err(status_error(status.as_u16(), &body));
        }

        response
            .json()
            .map_err(|e| FetchError::malformed(format!("Unexpected analysis response: {e}")))
    }
}

/// Map a non-success answer to an error, preferring the service's own
/// `{"error": ...}` message.
fn status_error(status: u16, body: &str) -> FetchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("Analysis service returned status {status}: {body}"));

    let kind = match status {
        400 => FetchErrorKind::Validation,
        404 => FetchErrorKind::NotFound,
        _ => FetchErrorKind::Service,
    };
    FetchError::new(kind, message)
}

impl AnalysisService for HttpAnalysisService {
    fn chronic_disease(&self, region_id: &str) -> Result<ChronicDiseaseAnalysis, FetchError> {
        require("Region id", region_id)?;
        self.post("/chronic-disease", &json!({ "region_id": region_id }))
    }

    fn patient_analysis(&self, visit_patient_id: &str) -> Result<PatientAnalysis, FetchError> {
        require("Patient id", visit_patient_id)?;
        self.post("/analysis", &json!({ "visit_patient_id": visit_patient_id }))
    }

    fn community_health(&self, region_id: &str) -> Result<Value, FetchError> {
        require("Region id", region_id)?;
        self.post("/community-health", &json!({ "region_id": region_id }))
    }

    fn chat(&self, request: &ChatRequest) -> Result<ChatReply, FetchError> {
        request.validate()?;
        self.post("/doctor/chat-ai", request)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Mock implementation
// ═══════════════════════════════════════════════════════════════════════════

/// In-process stand-in returning canned results and counting calls.
pub struct MockAnalysisService {
    chronic: Mutex<Result<ChronicDiseaseAnalysis, FetchError>>,
    patient: Mutex<Result<PatientAnalysis, FetchError>>,
    reply: String,
    calls: AtomicUsize,
}

impl MockAnalysisService {
    pub fn new() -> Self {
        Self {
            chronic: Mutex::new(Err(FetchError::not_found("No health records found"))),
            patient: Mutex::new(Err(FetchError::not_found("Analysis failed or no data found"))),
            reply: "No concerns identified.".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_chronic(self, result: Result<ChronicDiseaseAnalysis, FetchError>) -> Self {
        if let Ok(mut slot) = self.chronic.lock() {
            *slot = result;
        }
        self
    }

    pub fn with_patient(self, result: Result<PatientAnalysis, FetchError>) -> Self {
        if let Ok(mut slot) = self.patient.lock() {
            *slot = result;
        }
        self
    }

    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    /// Requests that passed validation.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockAnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisService for MockAnalysisService {
    fn chronic_disease(&self, region_id: &str) -> Result<ChronicDiseaseAnalysis, FetchError> {
        require("Region id", region_id)?;
        self.record();
        self.chronic
            .lock()
            .map_err(|_| FetchError::service("mock lock poisoned"))?
            .clone()
    }

    fn patient_analysis(&self, visit_patient_id: &str) -> Result<PatientAnalysis, FetchError> {
        require("Patient id", visit_patient_id)?;
        self.record();
        self.patient
            .lock()
            .map_err(|_| FetchError::service("mock lock poisoned"))?
            .clone()
    }

    fn community_health(&self, region_id: &str) -> Result<Value, FetchError> {
        require("Region id", region_id)?;
        self.record();
        Ok(json!({ "region_id": region_id, "status": "ok" }))
    }

    fn chat(&self, request: &ChatRequest) -> Result<ChatReply, FetchError> {
        request.validate()?;
        self.record();
        Ok(ChatReply {
            response: self.reply.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_uses_service_field_names() {
        let mut request = ChatRequest::new("Is this rash contagious?");
        request.conversation.push(ChatTurn {
            role: "user".into(),
            content: "Hello".into(),
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "Is this rash contagious?");
        assert_eq!(json["conversationsNew"][0]["role"], "user");
        assert_eq!(json["option"], "A");
        assert_eq!(json["imgurl"], "NA");
    }

    #[test]
    fn chat_request_defaults_when_deserialized() {
        let request: ChatRequest = serde_json::from_str(r#"{"question": "hi"}"#).unwrap();
        assert!(request.conversation.is_empty());
        assert_eq!(request.option, DEFAULT_CHAT_OPTION);
        assert_eq!(request.imgurl, NO_IMAGE);
    }

    #[test]
    fn empty_question_rejected_before_any_request() {
        // Nothing listens on port 9; a request would fail as a network error.
        let service = HttpAnalysisService::new("http://127.0.0.1:9", 2);
        let err = service.chat(&ChatRequest::new("   ")).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Validation);
    }

    #[test]
    fn empty_region_rejected_before_any_request() {
        let service = HttpAnalysisService::new("http://127.0.0.1:9", 2);
        let err = service.chronic_disease("").unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Validation);
    }

    #[test]
    fn unreachable_service_is_network_error() {
        let service = HttpAnalysisService::new("http://127.0.0.1:9/", 2);
        assert_eq!(service.base_url(), "http://127.0.0.1:9");
        let err = service.community_health("R1").unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Network);
    }

    #[test]
    fn status_errors_prefer_service_message() {
        let err = status_error(404, r#"{"error": "No health records found", "region_id": "R9"}"#);
        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert_eq!(err.message, "No health records found");

        let err = status_error(500, "boom");
        assert_eq!(err.kind, FetchErrorKind::Service);
        assert!(err.message.contains("500"));

        assert_eq!(status_error(400, "{}").kind, FetchErrorKind::Validation);
    }

    #[test]
    fn mock_counts_only_validated_calls() {
        let mock = MockAnalysisService::new().with_reply("Rest and fluids.");
        assert!(mock.chat(&ChatRequest::new("")).is_err());
        assert_eq!(mock.calls(), 0);
        let reply = mock.chat(&ChatRequest::new("Fever for 3 days?")).unwrap();
        assert_eq!(reply.response, "Rest and fluids.");
        assert_eq!(mock.calls(), 1);
    }
}
