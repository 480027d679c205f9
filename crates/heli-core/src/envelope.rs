//! Request and response envelopes exchanged over `POST /process`
//!
//! The shapes follow the annotation-service convention: successful calls
//! wrap an `annotations` response under `"response"`, failed calls wrap a
//! list of status messages under `"failure"`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::types::LineAnnotation;

/// Message code for internal failures (also used for parameter-type errors)
pub const CODE_INTERNAL_ERROR: &str = "elg.service.internalError";

/// Message code for request bodies that cannot be decoded
pub const CODE_INVALID_REQUEST: &str = "elg.request.invalid";

/// Message code for request types other than `text`
pub const CODE_UNSUPPORTED_TYPE: &str = "elg.request.type.unsupported";

/// Message code for a dead or unresponsive classifier
pub const CODE_CLASSIFIER_UNAVAILABLE: &str = "lid.classifier.unavailable";

/// Message code for dropped `languageSet` entries
pub const CODE_INVALID_LANGUAGES: &str = "lid.request.parameter.languageSet.invalid";

/// Inbound text request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(rename = "type")]
    pub kind: String,

    /// Raw parameters; validated by the request handler
    #[serde(default)]
    pub params: Option<Map<String, Value>>,

    pub content: String,
}

impl TextRequest {
    /// Create a plain `text` request without parameters
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            params: None,
            content: content.into(),
        }
    }

    /// Attach a parameter
    pub fn with_param(mut self, key: &str, value: Value) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }
}

/// A coded, parameterized status message (used for warnings and errors)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub code: String,
    pub text: String,
    pub params: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl StatusMessage {
    /// Create a message without detail
    pub fn new(code: impl Into<String>, text: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
            params,
            detail: None,
        }
    }

    /// Internal service error carrying the underlying error text
    pub fn internal_error(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            code: CODE_INTERNAL_ERROR.to_string(),
            text: "Internal error during processing: {0}".to_string(),
            params: vec![detail.clone()],
            detail: Some(serde_json::json!({ "server error": detail })),
        }
    }

    /// Request body could not be decoded
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(
            CODE_INVALID_REQUEST,
            "Invalid request message: {0}",
            vec![reason.into()],
        )
    }

    /// Request `type` other than `text`
    pub fn unsupported_type(kind: impl Into<String>) -> Self {
        Self::new(
            CODE_UNSUPPORTED_TYPE,
            "Request type {0} not supported by this service",
            vec![kind.into()],
        )
    }

    /// Classifier process unusable
    pub fn classifier_unavailable(reason: impl Into<String>) -> Self {
        Self::new(
            CODE_CLASSIFIER_UNAVAILABLE,
            "Language classifier unavailable: {0}",
            vec![reason.into()],
        )
    }

    /// Warning listing the `languageSet` entries that were ignored
    pub fn invalid_languages(codes: &[String]) -> Self {
        Self::new(
            CODE_INVALID_LANGUAGES,
            "Ignored invalid language codes in languageSet: {0}",
            vec![codes.join(", ")],
        )
    }
}

/// Per-language annotation buckets
pub type Annotations = BTreeMap<String, Vec<LineAnnotation>>;

/// Successful annotation response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationsResponse {
    #[serde(rename = "type")]
    pub kind: String,

    pub annotations: Annotations,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StatusMessage>,
}

impl AnnotationsResponse {
    /// Create a response from assembled buckets
    pub fn new(annotations: Annotations) -> Self {
        Self {
            kind: "annotations".to_string(),
            annotations,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings
    pub fn with_warnings(mut self, warnings: Vec<StatusMessage>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Total number of line annotations across all buckets
    pub fn line_count(&self) -> usize {
        self.annotations.values().map(Vec::len).sum()
    }
}

/// `{"response": ...}` wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub response: AnnotationsResponse,
}

/// List of errors for a failed call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub errors: Vec<StatusMessage>,
}

/// `{"failure": ...}` wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub failure: Failure,
}

impl From<StatusMessage> for FailureEnvelope {
    fn from(message: StatusMessage) -> Self {
        Self {
            failure: Failure {
                errors: vec![message],
            },
        }
    }
}
