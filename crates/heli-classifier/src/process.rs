//! HeLI subprocess management
//!
//! Handles spawning the classifier, the stdin/stdout exchange for one line,
//! and recovery after the process dies or stops answering.

use async_trait::async_trait;
use heli_core::{Candidate, Error, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, error, info, warn};

use crate::classifier::LineClassifier;
use crate::config::ClassifierConfig;
use crate::protocol::{ProtocolState, ResponseReader};

/// Pipes of a live classifier process
struct RunningProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// The long-lived HeLI process
pub struct HeliProcess {
    config: ClassifierConfig,
    running: Option<RunningProcess>,
    started: bool,
    restarts: u64,
    /// A line was written but its answer was not fully read
    in_flight: bool,
}

impl HeliProcess {
    /// Create a handle without launching anything yet
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            running: None,
            started: false,
            restarts: 0,
            in_flight: false,
        }
    }

    /// Validate the configuration and launch the process
    pub fn spawn(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let mut process = Self::new(config);
        process.start()?;
        Ok(process)
    }

    /// Number of times the process was relaunched after a failure
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// OS process id, if running
    pub fn pid(&self) -> Option<u32> {
        self.running.as_ref().and_then(|r| r.child.id())
    }

    fn start(&mut self) -> Result<()> {
        let (program, args) = self.config.command_line();
        info!(program = %program, args = ?args, "Launching classifier process");

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::unavailable(format!("failed to launch {}: {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::unavailable("classifier stdin not available"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::unavailable("classifier stdout not available"))?;

        info!(pid = ?child.id(), "Classifier process started");

        self.running = Some(RunningProcess {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        });
        self.started = true;
        Ok(())
    }

    /// Drop the current process; `kill_on_drop` takes care of the child
    fn discard(&mut self) {
        self.in_flight = false;
        if let Some(mut running) = self.running.take() {
            if let Err(e) = running.child.start_kill() {
                debug!("Classifier process already gone: {}", e);
            }
        }
    }

    fn check_alive(&mut self) -> bool {
        let Some(running) = self.running.as_mut() else {
            return false;
        };

        match running.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                warn!(%status, "Classifier process exited");
                self.running = None;
                false
            }
            Err(e) => {
                warn!("Failed to poll classifier process: {}", e);
                self.discard();
                false
            }
        }
    }

    async fn exchange(&mut self, line: &str) -> Result<Vec<Candidate>> {
        let timeout = self.config.read_timeout();
        let timeout_ms = self.config.read_timeout_ms;
        let mut reader = ResponseReader::new(self.config.max_candidate_lines);

        let running = self
            .running
            .as_mut()
            .ok_or_else(|| Error::unavailable("classifier process is not running"))?;

        let mut payload = String::with_capacity(line.len() + 1);
        payload.push_str(line);
        payload.push('\n');

        // Cleared only once the full answer is read; a dropped future leaves it set
        self.in_flight = true;
        tokio::time::timeout(timeout, async {
            running.stdin.write_all(payload.as_bytes()).await?;
            running.stdin.flush().await
        })
        .await
        .map_err(|_| Error::Timeout(timeout_ms))??;

        let mut buf = String::new();
        while reader.state() == ProtocolState::AwaitingCandidate {
            buf.clear();
            let read = tokio::time::timeout(timeout, running.stdout.read_line(&mut buf))
                .await
                .map_err(|_| Error::Timeout(timeout_ms))??;

            if read == 0 {
                return Err(Error::unavailable("classifier closed its output stream"));
            }
            reader.feed(&buf)?;
        }

        let candidates = reader.finish()?;
        self.in_flight = false;
        Ok(candidates)
    }
}

#[async_trait]
impl LineClassifier for HeliProcess {
    async fn classify_line(&mut self, line: &str) -> Result<Vec<Candidate>> {
        match self.exchange(line).await {
            Ok(candidates) => {
                debug!(candidates = candidates.len(), "Classifier answered");
                Ok(candidates)
            }
            Err(e) => {
                if e.is_classifier_failure() {
                    error!("Classifier exchange failed, discarding process: {}", e);
                    self.discard();
                }
                Err(e)
            }
        }
    }

    async fn ensure_ready(&mut self) -> Result<()> {
        if self.in_flight {
            warn!("Previous exchange was abandoned mid-answer, discarding process");
            self.discard();
        }

        if self.check_alive() {
            return Ok(());
        }

        if self.started {
            if !self.config.restart_on_failure {
                return Err(Error::unavailable(
                    "classifier process is not running and restarts are disabled",
                ));
            }
            self.restarts += 1;
            warn!(restarts = self.restarts, "Restarting classifier process");
        }

        self.start()
    }

    fn is_running(&mut self) -> bool {
        !self.in_flight && self.check_alive()
    }

    fn name(&self) -> &str {
        "heli"
    }
}
