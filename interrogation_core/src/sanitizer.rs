//! Response sanitizing - turns a raw completion into one clean character line.
//!
//! Steps per pass:
//! 1. **Echo strip**: drop the prompt if the completion repeats it
//! 2. **Collapse**: keep only what follows the last character label
//! 3. **Leak truncation**: cut at the earliest marker of another speaker,
//!    heading, aside, or example block
//! 4. **Trim**
//!
//! Passes repeat until the text stops changing, and an empty result becomes
//! a fixed placeholder, so sanitizing a sanitized reply changes nothing.

use crate::speaker::{ASKER_LABEL, ASKER_LABEL_WIDE, CHARACTER_LABEL, CHARACTER_LABEL_WIDE};

/// Reply used when nothing usable is left.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "……。";

const CHARACTER_LABELS: [&str; 2] = [CHARACTER_LABEL, CHARACTER_LABEL_WIDE];

/// Truncation markers, checked independently; the earliest hit wins.
const LEAK_MARKERS: &[&str] = &[
    ASKER_LABEL,
    ASKER_LABEL_WIDE,
    CHARACTER_LABEL,
    CHARACTER_LABEL_WIDE,
    "【",
    "（",
    "(",
    "会話例",
    "重要：",
];

/// Markers a backend should stop generating at.
const STOP_MARKERS: &[&str] = &[ASKER_LABEL, ASKER_LABEL_WIDE, "【", "（"];

/// Cleans raw completions before they reach the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSanitizer;

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Sanitize a raw completion produced for `prompt`.
    pub fn sanitize(&self, raw: &str, prompt: &str) -> String {
        if raw.trim() == EMPTY_REPLY_PLACEHOLDER {
            return EMPTY_REPLY_PLACEHOLDER.to_string();
        }

        let mut current = raw.to_string();
        loop {
            // Every step only shortens the text, so this terminates
            let next = Self::pass(&current, prompt);
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            EMPTY_REPLY_PLACEHOLDER.to_string()
        } else {
            current
        }
    }

    /// Stop strings for a backend, with and without a leading newline.
    pub fn stop_sequences() -> Vec<String> {
        let mut stops = Vec::new();
        for marker in STOP_MARKERS {
            for stop in [format!("\n{}", marker), marker.to_string()] {
                if !stops.contains(&stop) {
                    stops.push(stop);
                }
            }
        }
        stops
    }

    fn pass(text: &str, prompt: &str) -> String {
        let mut out = text.trim_start();

        if !prompt.is_empty() {
            if let Some(rest) = out.strip_prefix(prompt) {
                out = rest;
            }
        }

        if Self::label_count(out) > 1 {
            out = Self::after_last_label(out);
        }

        out = out.trim_start();
        for label in CHARACTER_LABELS {
            if let Some(rest) = out.strip_prefix(label) {
                out = rest;
                break;
            }
        }

        if let Some(cut) = Self::earliest_marker(out) {
            out = &out[..cut];
        }

        out.trim().to_string()
    }

    fn label_count(text: &str) -> usize {
        CHARACTER_LABELS
            .iter()
            .map(|label| text.matches(label).count())
            .sum()
    }

    fn after_last_label(text: &str) -> &str {
        CHARACTER_LABELS
            .iter()
            .filter_map(|label| text.rfind(label).map(|pos| pos + label.len()))
            .max()
            .map(|start| &text[start..])
            .unwrap_or(text)
    }

    fn earliest_marker(text: &str) -> Option<usize> {
        LEAK_MARKERS
            .iter()
            .filter_map(|marker| text.find(marker))
            .min()
    }
}
