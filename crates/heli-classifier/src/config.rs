//! Configuration for launching the HeLI classifier process

use heli_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::langcodes;

/// How the classifier executable is launched
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// `java` from PATH with default JVM settings
    Development,
    /// Bundled JVM with fixed heap settings
    #[default]
    Container,
}

/// Settings for the classifier subprocess
///
/// Everything here is baked in at process launch. Per-request options are
/// applied to the classifier's output instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Launch flavor
    #[serde(default)]
    pub launch: LaunchMode,

    /// Java executable override
    #[serde(default)]
    pub java_bin: Option<PathBuf>,

    /// Path to the HeLI jar
    #[serde(default = "default_jar")]
    pub jar: PathBuf,

    /// Extra JVM arguments for container launches
    #[serde(default = "default_jvm_args")]
    pub jvm_args: Vec<String>,

    /// Number of ranked candidates the classifier prints per line (`-t`)
    #[serde(default = "default_best_langs")]
    pub best_langs: usize,

    /// Restrict the classifier's model to these languages (`-l`)
    #[serde(default)]
    pub languages: Vec<String>,

    /// Full command override; bypasses the java/jar command line when set
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Working directory for the process
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Maximum wait for a single stdout line
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Upper bound on candidate lines for one input line
    #[serde(default = "default_max_candidate_lines")]
    pub max_candidate_lines: usize,

    /// Respawn the process on the next request after it failed
    #[serde(default = "default_true")]
    pub restart_on_failure: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            launch: LaunchMode::default(),
            java_bin: None,
            jar: default_jar(),
            jvm_args: default_jvm_args(),
            best_langs: default_best_langs(),
            languages: Vec::new(),
            command: None,
            working_dir: None,
            read_timeout_ms: default_read_timeout_ms(),
            max_candidate_lines: default_max_candidate_lines(),
            restart_on_failure: true,
        }
    }
}

impl ClassifierConfig {
    /// Check the settings before anything is spawned
    pub fn validate(&self) -> Result<()> {
        if self.best_langs == 0 {
            return Err(Error::config("best_langs must be at least 1"));
        }
        if self.max_candidate_lines == 0 {
            return Err(Error::config("max_candidate_lines must be at least 1"));
        }
        if self.read_timeout_ms == 0 {
            return Err(Error::config("read_timeout_ms must be at least 1"));
        }
        if let Some(command) = &self.command {
            if command.is_empty() {
                return Err(Error::config("command override must name a program"));
            }
        }

        let invalid: Vec<&str> = self
            .languages
            .iter()
            .map(String::as_str)
            .filter(|code| !langcodes::is_valid(code))
            .collect();
        if !invalid.is_empty() {
            return Err(Error::config(format!(
                "unknown classifier languages: {}",
                invalid.join(", ")
            )));
        }

        Ok(())
    }

    /// Read timeout as a duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Program and arguments used to launch the classifier
    pub fn command_line(&self) -> (String, Vec<String>) {
        if let Some(command) = self.command.as_ref().filter(|c| !c.is_empty()) {
            return (command[0].clone(), command[1..].to_vec());
        }

        let mut args = Vec::new();
        let program = match self.launch {
            LaunchMode::Development => self
                .java_bin
                .clone()
                .unwrap_or_else(|| PathBuf::from("java")),
            LaunchMode::Container => {
                args.extend(self.jvm_args.iter().cloned());
                self.java_bin
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("/java/bin/java"))
            }
        };

        args.push("-jar".to_string());
        args.push(self.jar.display().to_string());

        if !self.languages.is_empty() {
            let languages: Vec<&str> = self
                .languages
                .iter()
                .map(|code| langcodes::to_alpha3(code).unwrap_or(code.as_str()))
                .collect();
            args.push("-l".to_string());
            args.push(languages.join(","));
        }

        args.push("-t".to_string());
        args.push(self.best_langs.to_string());

        (program.display().to_string(), args)
    }
}

fn default_jar() -> PathBuf {
    PathBuf::from("HeLI.jar")
}

fn default_jvm_args() -> Vec<String> {
    vec![
        "-XX:+UseG1GC".to_string(),
        "-Xms2g".to_string(),
        "-Xmx2g".to_string(),
    ]
}

fn default_best_langs() -> usize {
    10
}

fn default_read_timeout_ms() -> u64 {
    30_000
}

fn default_max_candidate_lines() -> usize {
    1024
}

fn default_true() -> bool {
    true
}
