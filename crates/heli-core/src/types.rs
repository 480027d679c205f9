//! Core types for language identification results

use serde::{Deserialize, Serialize};

/// Bucket key used for lines that resolved to no language
pub const NULL_BUCKET: &str = "null";

/// One ranked hypothesis returned by the classifier for one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// ISO 639 alpha-3 code (None only after an unmappable language remap)
    pub lang3: Option<String>,

    /// ISO 639 alpha-2 equivalent, if the language has one
    pub lang2: Option<String>,

    /// Log-probability-like score, higher is more likely
    pub score: f64,
}

impl Candidate {
    /// Create a candidate from explicit codes
    pub fn new(lang3: impl Into<String>, lang2: Option<&str>, score: f64) -> Self {
        Self {
            lang3: Some(lang3.into()),
            lang2: lang2.map(str::to_string),
            score,
        }
    }
}

/// Per-line features reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub lang3: Option<String>,
    pub lang2: Option<String>,
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

/// One output record per input line
///
/// `start` and `end` are character offsets into the submitted content,
/// end-exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnnotation {
    pub start: usize,
    pub end: usize,
    pub features: Features,
}

impl LineAnnotation {
    /// Key of the bucket this annotation belongs to
    pub fn bucket(&self) -> &str {
        self.features.lang3.as_deref().unwrap_or(NULL_BUCKET)
    }
}
