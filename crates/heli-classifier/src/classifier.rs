//! Line classifier trait

use async_trait::async_trait;
use heli_core::{Candidate, Result};

/// A backend that ranks languages for one line of text at a time.
///
/// Implementations hold conversational state (the HeLI process answers the
/// most recent line only), so every method takes `&mut self` and callers
/// reach them through [`crate::ClassifierChannel`], which serializes access.
#[async_trait]
pub trait LineClassifier: Send {
    /// Rank languages for an already sanitized line, best first
    async fn classify_line(&mut self, line: &str) -> Result<Vec<Candidate>>;

    /// Make the backend ready to answer, starting it if needed
    async fn ensure_ready(&mut self) -> Result<()>;

    /// Whether the backend is currently alive
    fn is_running(&mut self) -> bool;

    /// Get the classifier name
    fn name(&self) -> &str;
}
