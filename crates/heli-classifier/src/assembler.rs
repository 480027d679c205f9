//! Turns ranked candidates into per-line annotations

use heli_core::{Annotations, Candidate, Features, LineAnnotation, Result};
use std::collections::HashMap;

use crate::channel::ChannelSession;
use crate::langcodes;

/// Per-request options applied on top of the classifier's ranking
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Echo each line's original text in its annotation
    pub include_orig: bool,

    /// Accepted languages in preference order (normalized alpha-3 codes)
    pub language_set: Option<Vec<String>>,

    /// alpha-2 → alpha-2 rewrites applied to classifier output
    pub language_map: HashMap<String, String>,

    /// Only consider this many top candidates per line
    pub best_langs: Option<usize>,
}

/// Resolved label for one line
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub lang3: Option<String>,
    pub lang2: Option<String>,
    pub confidence: f64,
}

/// Pick the reported language for a line.
///
/// Without a language set the top candidate wins and confidence is the score
/// gap to the runner-up. With a language set the first candidate inside the
/// set wins; its score becomes the confidence only when it was also the top
/// candidate, otherwise confidence is zero. When no candidate is in the set,
/// the set's first language is reported with zero confidence.
pub fn resolve(candidates: &[Candidate], language_set: Option<&[String]>) -> Resolution {
    let mut resolution = match candidates {
        [] => Resolution {
            lang3: None,
            lang2: None,
            confidence: 0.0,
        },
        [only] => Resolution {
            lang3: only.lang3.clone(),
            lang2: only.lang2.clone(),
            confidence: 0.0,
        },
        [first, second, ..] => Resolution {
            lang3: first.lang3.clone(),
            lang2: first.lang2.clone(),
            confidence: first.score - second.score,
        },
    };

    match language_set {
        None => {}
        Some([]) => {
            resolution = Resolution {
                lang3: None,
                lang2: None,
                confidence: 0.0,
            };
        }
        Some(set) => {
            resolution = Resolution {
                lang3: Some(set[0].clone()),
                lang2: langcodes::to_alpha2(&set[0]).map(str::to_string),
                confidence: 0.0,
            };

            let hit = candidates.iter().enumerate().find(|(_, c)| {
                c.lang3
                    .as_ref()
                    .is_some_and(|lang3| set.iter().any(|s| s == lang3))
            });

            if let Some((rank, candidate)) = hit {
                resolution = Resolution {
                    lang3: candidate.lang3.clone(),
                    lang2: candidate.lang2.clone(),
                    confidence: if rank == 0 { candidate.score } else { 0.0 },
                };
            }
        }
    }

    resolution
}

/// Apply a caller-supplied alpha-2 remapping to classifier candidates
pub fn remap_candidates(candidates: &mut [Candidate], language_map: &HashMap<String, String>) {
    if language_map.is_empty() {
        return;
    }

    for candidate in candidates.iter_mut() {
        let Some(target) = candidate
            .lang2
            .as_ref()
            .and_then(|lang2| language_map.get(lang2))
        else {
            continue;
        };

        candidate.lang3 = langcodes::to_alpha3(target).map(str::to_string);
        candidate.lang2 = Some(target.clone());
    }
}

/// Collects line annotations and tracks character offsets
pub struct ResultAssembler<'a> {
    options: &'a AssemblyOptions,
    offset: usize,
    annotations: Annotations,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(options: &'a AssemblyOptions) -> Self {
        Self {
            options,
            offset: 0,
            annotations: Annotations::new(),
        }
    }

    /// Add the classifier's answer for the next line of the content.
    ///
    /// `original` is the line as submitted; its character length drives the
    /// offsets, plus one for the newline that separated it from the next line.
    pub fn push_line(&mut self, original: &str, mut candidates: Vec<Candidate>) {
        if let Some(limit) = self.options.best_langs {
            candidates.truncate(limit);
        }
        remap_candidates(&mut candidates, &self.options.language_map);

        let resolution = resolve(&candidates, self.options.language_set.as_deref());

        let length = original.chars().count();
        let annotation = LineAnnotation {
            start: self.offset,
            end: self.offset + length,
            features: Features {
                lang3: resolution.lang3,
                lang2: resolution.lang2,
                confidence: resolution.confidence,
                original_text: self.options.include_orig.then(|| original.to_string()),
            },
        };
        self.offset += length + 1;

        self.annotations
            .entry(annotation.bucket().to_string())
            .or_default()
            .push(annotation);
    }

    pub fn finish(self) -> Annotations {
        self.annotations
    }
}

/// Run every line of `content` through the classifier and assemble the result.
///
/// Lines are split on `\n` only, so a trailing newline yields a final empty
/// line, and `\r` stays part of the original line for offset purposes.
pub async fn annotate(
    session: &mut ChannelSession<'_>,
    content: &str,
    options: &AssemblyOptions,
) -> Result<Annotations> {
    let mut assembler = ResultAssembler::new(options);
    for line in content.split('\n') {
        let candidates = session.classify(line).await?;
        assembler.push_line(line, candidates);
    }
    Ok(assembler.finish())
}
