//! HeLI stdout protocol
//!
//! For every input line the classifier prints zero or more candidate lines
//! of the form `[fin, est],7.53` followed by a terminator: an empty line or
//! the literal `xxx`. All languages inside one bracket share the score.

use heli_core::{Candidate, Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::langcodes;

/// Literal terminator some HeLI builds print instead of an empty line
pub const TERMINATOR: &str = "xxx";

static CANDIDATE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(.*)\],([0-9.]+)").expect("candidate pattern is valid"));

/// Where the reader is within the answer for one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// More candidate lines may follow
    AwaitingCandidate,
    /// The terminator was seen; the answer is complete
    EndOfLine,
}

/// Accumulates the answer for a single input line
#[derive(Debug)]
pub struct ResponseReader {
    state: ProtocolState,
    candidates: Vec<Candidate>,
    lines_seen: usize,
    max_lines: usize,
}

impl ResponseReader {
    /// Create a reader that rejects answers longer than `max_lines`
    pub fn new(max_lines: usize) -> Self {
        Self {
            state: ProtocolState::AwaitingCandidate,
            candidates: Vec::new(),
            lines_seen: 0,
            max_lines,
        }
    }

    /// Current state
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Feed one raw stdout line (with or without its trailing newline)
    pub fn feed(&mut self, raw: &str) -> Result<ProtocolState> {
        if self.state == ProtocolState::EndOfLine {
            return Err(Error::protocol("output received after end of answer"));
        }

        let line = raw.trim_end_matches(['\n', '\r']);
        if line.is_empty() || line == TERMINATOR {
            self.state = ProtocolState::EndOfLine;
            return Ok(self.state);
        }

        self.lines_seen += 1;
        if self.lines_seen > self.max_lines {
            return Err(Error::protocol(format!(
                "more than {} candidate lines without a terminator",
                self.max_lines
            )));
        }

        match parse_candidate_line(line) {
            Some(parsed) => self.candidates.extend(parsed),
            None => debug!(line = %line, "Skipping unrecognized classifier output"),
        }

        Ok(self.state)
    }

    /// Consume the reader, returning the ranked candidates
    pub fn finish(self) -> Result<Vec<Candidate>> {
        match self.state {
            ProtocolState::EndOfLine => Ok(self.candidates),
            ProtocolState::AwaitingCandidate => {
                Err(Error::protocol("answer ended without a terminator"))
            }
        }
    }
}

/// Parse one `[lang, lang],score` line into candidates.
///
/// Returns `None` when the line does not follow the candidate format.
pub fn parse_candidate_line(line: &str) -> Option<Vec<Candidate>> {
    let caps = CANDIDATE_LINE.captures(line)?;
    let score: f64 = caps[2].parse().ok()?;

    let candidates = caps[1]
        .split(", ")
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| Candidate {
            lang3: Some(code.to_string()),
            lang2: langcodes::to_alpha2(code).map(str::to_string),
            score,
        })
        .collect();

    Some(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_language() {
        let candidates = parse_candidate_line("[fin],5.25").unwrap();
        assert_eq!(candidates, vec![Candidate::new("fin", Some("fi"), 5.25)]);
    }

    #[test]
    fn test_parse_shared_score() {
        let candidates = parse_candidate_line("[swe, nor],3.5").unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].lang3.as_deref(), Some("swe"));
        assert_eq!(candidates[1].lang3.as_deref(), Some("nor"));
        assert_eq!(candidates[1].lang2.as_deref(), Some("no"));
        assert!(candidates.iter().all(|c| c.score == 3.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_candidate_line("Exception in thread main").is_none());
        assert!(parse_candidate_line("[fin],").is_none());
        assert!(parse_candidate_line("fin,3.0").is_none());
    }

    #[test]
    fn test_reader_state_machine() {
        let mut reader = ResponseReader::new(16);
        assert_eq!(reader.state(), ProtocolState::AwaitingCandidate);

        assert_eq!(reader.feed("[fin],9.0\n").unwrap(), ProtocolState::AwaitingCandidate);
        assert_eq!(reader.feed("noise\n").unwrap(), ProtocolState::AwaitingCandidate);
        assert_eq!(reader.feed("[est, krl],7.5\n").unwrap(), ProtocolState::AwaitingCandidate);
        assert_eq!(reader.feed("\n").unwrap(), ProtocolState::EndOfLine);

        let candidates = reader.finish().unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].lang3.as_deref(), Some("fin"));
        assert_eq!(candidates[2].lang3.as_deref(), Some("krl"));
    }

    #[test]
    fn test_reader_xxx_terminator() {
        let mut reader = ResponseReader::new(16);
        assert_eq!(reader.feed("xxx\n").unwrap(), ProtocolState::EndOfLine);
        assert!(reader.finish().unwrap().is_empty());
    }

    #[test]
    fn test_reader_rejects_output_after_end() {
        let mut reader = ResponseReader::new(16);
        reader.feed("").unwrap();
        assert!(reader.feed("[fin],1.0").is_err());
    }

    #[test]
    fn test_reader_line_guard() {
        let mut reader = ResponseReader::new(2);
        reader.feed("[fin],3.0").unwrap();
        reader.feed("[est],2.0").unwrap();
        let err = reader.feed("[swe],1.0").unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_unterminated_answer() {
        let mut reader = ResponseReader::new(4);
        reader.feed("[fin],3.0").unwrap();
        assert!(reader.finish().is_err());
    }
}
