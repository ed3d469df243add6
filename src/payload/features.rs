// Fri Jan 23 2026 - Alex

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LOREM_MARKERS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit amet", "consectetur",
    "adipiscing", "elit", "sed do", "eiusmod", "tempor",
    "incididunt", "labore", "dolore", "magna", "aliqua",
];

const DEFAULT_MARKER_THRESHOLD: usize = 3;

/// Cheap content signals computed next to the structural check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadFeatures {
    /// Bits per character. High values hint at compressed or obfuscated content.
    pub entropy: f64,
    pub filler_text: bool,
}

impl PayloadFeatures {
    pub fn extract(payload: Option<&str>, detector: &FillerDetector) -> Self {
        let text = payload.unwrap_or("");
        Self {
            entropy: shannon_entropy(text),
            filler_text: detector.is_filler(text),
        }
    }
}

/// Shannon entropy, base 2, over character frequencies. 0 for empty input.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in text.chars() {
        *freq.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy: f64 = freq
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    // -0.0 for single-symbol input
    entropy.abs()
}

/// Flags placeholder text by counting distinct lorem-ipsum markers.
#[derive(Debug, Clone)]
pub struct FillerDetector {
    markers: Vec<String>,
    threshold: usize,
}

impl FillerDetector {
    pub fn new() -> Self {
        Self {
            markers: LOREM_MARKERS.iter().map(|m| m.to_string()).collect(),
            threshold: DEFAULT_MARKER_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_markers(mut self, markers: &[&str]) -> Self {
        self.markers = markers.iter().map(|m| m.to_lowercase()).collect();
        self
    }

    pub fn marker_hits(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.markers.iter().filter(|m| lower.contains(m.as_str())).count()
    }

    pub fn is_filler(&self, text: &str) -> bool {
        self.marker_hits(text) >= self.threshold
    }
}

impl Default for FillerDetector {
    fn default() -> Self {
        Self::new()
    }
}
