use std::sync::Arc;
use serde::Serialize;
use super::matcher::match_line;
use super::shape::FormatDefinition;
use super::{HIGH_CONFIDENCE_THRESHOLD, MAX_LINE_SIZE, MEDIUM_CONFIDENCE_THRESHOLD};

/// Which candidate format recognized a sample, and how much of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub format: Option<String>,
    pub confidence: f32,
}

impl DetectionResult {
    pub fn new(format: impl Into<String>, confidence: f32) -> Self {
        Self {
            format: Some(format.into()),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn no_match() -> Self {
        Self {
            format: None,
            confidence: 0.0,
        }
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence >= HIGH_CONFIDENCE_THRESHOLD
    }

    pub fn is_medium_confidence(&self) -> bool {
        self.confidence >= MEDIUM_CONFIDENCE_THRESHOLD
    }
}

/// Picks the candidate format that matches the largest share of a sample.
///
/// Order matters: on equal scores the earlier candidate wins. Sample
/// lines longer than `max_line_size` are left out of the score.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    candidates: Vec<Arc<FormatDefinition>>,
    max_line_size: usize,
}

impl FormatDetector {
    pub fn new(candidates: Vec<Arc<FormatDefinition>>) -> Self {
        Self {
            candidates,
            max_line_size: MAX_LINE_SIZE,
        }
    }

    pub fn with_max_line_size(mut self, max_line_size: usize) -> Self {
        self.max_line_size = max_line_size;
        self
    }

    pub fn candidates(&self) -> &[Arc<FormatDefinition>] {
        &self.candidates
    }

    /// Score every candidate against the non-blank lines of `samples`.
    pub fn detect<S: AsRef<str>>(&self, samples: &[S]) -> DetectionResult {
        self.best(samples)
            .map(|(index, score)| DetectionResult::new(self.candidates[index].name(), score))
            .unwrap_or_else(DetectionResult::no_match)
    }

    /// Like [`FormatDetector::detect`], also returning the winning definition.
    pub fn detect_definition<S: AsRef<str>>(
        &self,
        samples: &[S],
    ) -> Option<(Arc<FormatDefinition>, DetectionResult)> {
        self.best(samples).map(|(index, score)| {
            let winner = &self.candidates[index];
            (Arc::clone(winner), DetectionResult::new(winner.name(), score))
        })
    }

    fn best<S: AsRef<str>>(&self, samples: &[S]) -> Option<(usize, f32)> {
        let lines: Vec<&str> = samples
            .iter()
            .map(AsRef::as_ref)
            .filter(|line| line.len() <= self.max_line_size && !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            let matched = lines
                .iter()
                .filter(|line| match_line(candidate, line).is_some())
                .count();
            let score = matched as f32 / lines.len() as f32;

            if matched > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        best
    }
}
