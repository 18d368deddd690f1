/*!
 * Screenshot marker detection.
 *
 * Transcripts mark the places that need a picture with
 * `Screenshot-HH:MM:SS` or `Screenshot-[HH:MM:SS]`, optionally preceded by a
 * `*` left over from emphasis. Each textual occurrence becomes one `Marker`.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Regex for both marker forms; group 1-3 bracketed, group 4-6 bare
static SCREENSHOT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*?Screenshot-(?:\[([0-9]{2}):([0-9]{2}):([0-9]{2})\]|([0-9]{2}):([0-9]{2}):([0-9]{2}))",
    )
    .expect("Invalid screenshot marker regex")
});

/// How the hour field contributes to a marker's offset
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HourPolicy {
    /// Offset is `minutes*60 + seconds`; hours are parsed but ignored
    #[default]
    Discard,
    /// Offset is `hours*3600 + minutes*60 + seconds`
    Include,
}

/// A single screenshot marker found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Exact matched text, used for substitution
    pub raw_text: String,
    /// Offset into the video in seconds
    pub offset_seconds: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Byte position of the match in the scanned text
    pub position: usize,
}

/// Scanner for screenshot markers
pub struct MarkerExtractor;

impl MarkerExtractor {
    /// Find all markers in document order, discarding the hour field
    pub fn extract(text: &str) -> Vec<Marker> {
        Self::extract_with_policy(text, HourPolicy::Discard)
    }

    /// Find all markers in document order
    ///
    /// # Arguments
    /// * `text` - Markdown document to scan
    /// * `policy` - Whether hours are added into the offset
    ///
    /// # Returns
    /// * One `Marker` per occurrence; identical markers are not merged
    pub fn extract_with_policy(text: &str, policy: HourPolicy) -> Vec<Marker> {
        SCREENSHOT_MARKER_REGEX
            .captures_iter(text)
            .filter_map(|caps| Self::marker_from_captures(&caps, policy))
            .collect()
    }

    /// Check whether a text contains at least one marker
    pub fn contains_marker(text: &str) -> bool {
        SCREENSHOT_MARKER_REGEX.is_match(text)
    }

    fn marker_from_captures(caps: &Captures, policy: HourPolicy) -> Option<Marker> {
        let whole = caps.get(0)?;

        let hours = Self::field(caps, 1, 4);
        let minutes = Self::field(caps, 2, 5);
        let seconds = Self::field(caps, 3, 6);

        Some(Marker {
            raw_text: whole.as_str().to_string(),
            offset_seconds: Self::offset(hours, minutes, seconds, policy),
            hours,
            minutes,
            seconds,
            position: whole.start(),
        })
    }

    // Each field is two ASCII digits, so parsing cannot fail
    fn field(caps: &Captures, bracketed: usize, bare: usize) -> u32 {
        caps.get(bracketed)
            .or_else(|| caps.get(bare))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }

    /// Compute the offset in seconds for parsed marker fields
    pub fn offset(hours: u32, minutes: u32, seconds: u32, policy: HourPolicy) -> u64 {
        let base = u64::from(minutes) * 60 + u64::from(seconds);
        match policy {
            HourPolicy::Discard => base,
            HourPolicy::Include => u64::from(hours) * 3600 + base,
        }
    }
}
