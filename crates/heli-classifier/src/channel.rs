//! Serialized access to the single classifier backend

use heli_core::{Candidate, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::classifier::LineClassifier;
use crate::sanitize::sanitize_line;

/// Observed state of the classifier backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Alive and idle
    Running,
    /// A request currently holds the channel
    Busy,
    /// Not running; the next request will try to start it
    Stopped,
}

impl ChannelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Busy => "busy",
            Self::Stopped => "stopped",
        }
    }
}

/// Shared handle to the one classifier conversation.
///
/// A whole request's line sequence runs inside one [`ChannelSession`], so
/// lines from concurrent requests never interleave on the process pipes.
#[derive(Clone)]
pub struct ClassifierChannel {
    inner: Arc<Mutex<Box<dyn LineClassifier>>>,
}

impl ClassifierChannel {
    /// Wrap a classifier backend
    pub fn new(classifier: impl LineClassifier + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(classifier))),
        }
    }

    /// Wait for exclusive access and make sure the backend is up
    pub async fn session(&self) -> Result<ChannelSession<'_>> {
        let mut guard = self.inner.lock().await;
        guard.ensure_ready().await?;
        debug!(classifier = guard.name(), "Classifier session opened");
        Ok(ChannelSession { guard })
    }

    /// Report backend state without waiting for a running request
    pub fn status(&self) -> ChannelStatus {
        match self.inner.try_lock() {
            Ok(mut guard) => {
                if guard.is_running() {
                    ChannelStatus::Running
                } else {
                    ChannelStatus::Stopped
                }
            }
            Err(_) => ChannelStatus::Busy,
        }
    }
}

/// Exclusive access to the classifier for the duration of one request
pub struct ChannelSession<'a> {
    guard: MutexGuard<'a, Box<dyn LineClassifier>>,
}

impl ChannelSession<'_> {
    /// Sanitize a raw input line and rank its languages
    pub async fn classify(&mut self, raw_line: &str) -> Result<Vec<Candidate>> {
        let line = sanitize_line(raw_line);
        self.guard.classify_line(&line).await
    }
}
