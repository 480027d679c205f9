//! HeLI Core
//!
//! Core types shared across the HeLI language identification service.
//!
//! This crate provides:
//! - Classifier candidates and per-line annotations
//! - Request/response envelopes for the `/process` endpoint
//! - Error types and result handling

pub mod envelope;
pub mod error;
pub mod types;

pub use envelope::{
    Annotations, AnnotationsResponse, Failure, FailureEnvelope, ResponseEnvelope, StatusMessage,
    TextRequest,
};
pub use error::{Error, Result};
pub use types::{Candidate, Features, LineAnnotation, NULL_BUCKET};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::envelope::{AnnotationsResponse, StatusMessage, TextRequest};
    pub use crate::error::{Error, Result};
    pub use crate::types::{Candidate, Features, LineAnnotation};
}
