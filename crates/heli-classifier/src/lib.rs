//! HeLI Classifier
//!
//! Adapter around the HeLI language identifier, which runs as an external
//! Java process answering one line of text at a time.
//!
//! The flow for one request:
//! - [`sanitize`] makes each line safe for the line protocol
//! - [`channel`] serializes the request against the single process
//! - [`protocol`] parses the ranked `[lang, ...],score` answers
//! - [`assembler`] applies per-request options and tracks offsets

pub mod assembler;
pub mod channel;
pub mod classifier;
pub mod config;
pub mod langcodes;
pub mod process;
pub mod protocol;
pub mod sanitize;

pub use assembler::{annotate, AssemblyOptions, Resolution, ResultAssembler};
pub use channel::{ChannelSession, ChannelStatus, ClassifierChannel};
pub use classifier::LineClassifier;
pub use config::{ClassifierConfig, LaunchMode};
pub use process::HeliProcess;
pub use protocol::{ProtocolState, ResponseReader};
pub use sanitize::sanitize_line;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::assembler::{annotate, AssemblyOptions};
    pub use crate::channel::ClassifierChannel;
    pub use crate::classifier::LineClassifier;
    pub use crate::config::ClassifierConfig;
    pub use crate::process::HeliProcess;
}
