/*!
 * Marker substitution.
 *
 * Replaces each screenshot marker with an image link to a frame captured at
 * the marker's offset. Markers are scanned once up front and processed in
 * document order; each one replaces only the first remaining occurrence of
 * its text, so identical markers are resolved one by one. A failed capture
 * leaves its marker in place and processing moves on.
 */

use std::path::Path;

use crate::errors::FrameError;
use crate::frame_extractor::{ExtractedFrame, FrameExtractor};
use crate::markers::{HourPolicy, Marker, MarkerExtractor};
use crate::observer::SubstitutionObserver;

/// Result of processing a single marker
#[derive(Debug)]
pub enum MarkerOutcome {
    /// The marker was replaced by `link`
    Substituted {
        marker: Marker,
        frame: ExtractedFrame,
        link: String,
    },
    /// The capture failed; the marker text is unchanged
    Failed { marker: Marker, reason: FrameError },
}

impl MarkerOutcome {
    pub fn marker(&self) -> &Marker {
        match self {
            Self::Substituted { marker, .. } | Self::Failed { marker, .. } => marker,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, Self::Substituted { .. })
    }
}

/// Processed document together with the per-marker outcomes
#[derive(Debug, Default)]
pub struct SubstitutionReport {
    pub document: String,
    pub outcomes: Vec<MarkerOutcome>,
}

impl SubstitutionReport {
    pub fn substituted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_substituted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.substituted_count()
    }
}

/// Build the Markdown image embed for a captured file
///
/// Trailing slashes of `url_base` are dropped before joining.
pub fn image_link(url_base: &str, file_name: &str) -> String {
    format!("![]({}/{})", url_base.trim_end_matches('/'), file_name)
}

/// Drives marker scanning, frame capture and text replacement
pub struct SubstitutionEngine<'a, E: FrameExtractor> {
    extractor: E,
    observer: &'a dyn SubstitutionObserver,
    hour_policy: HourPolicy,
}

impl<'a, E: FrameExtractor> SubstitutionEngine<'a, E> {
    pub fn new(extractor: E, observer: &'a dyn SubstitutionObserver) -> Self {
        Self {
            extractor,
            observer,
            hour_policy: HourPolicy::default(),
        }
    }

    pub fn with_hour_policy(mut self, hour_policy: HourPolicy) -> Self {
        self.hour_policy = hour_policy;
        self
    }

    /// Replace markers in `text` and return the new document
    ///
    /// Without a video the input is returned unchanged.
    pub fn substitute(
        &self,
        text: &str,
        video: Option<&Path>,
        output_dir: &Path,
        url_base: &str,
    ) -> String {
        self.substitute_with_report(text, video, output_dir, url_base)
            .document
    }

    /// Replace markers in `text`, keeping a record of every marker's outcome
    pub fn substitute_with_report(
        &self,
        text: &str,
        video: Option<&Path>,
        output_dir: &Path,
        url_base: &str,
    ) -> SubstitutionReport {
        let Some(video) = video else {
            self.observer.video_missing();
            return SubstitutionReport {
                document: text.to_string(),
                outcomes: Vec::new(),
            };
        };

        let markers = MarkerExtractor::extract_with_policy(text, self.hour_policy);
        self.observer.markers_found(markers.len());

        let mut document = text.to_string();
        let mut outcomes = Vec::with_capacity(markers.len());

        for marker in markers {
            self.observer.frame_requested(&marker);

            match self.extractor.extract_frame(video, output_dir, marker.offset_seconds) {
                Ok(frame) => {
                    let link = image_link(url_base, &frame.file_name());
                    document = document.replacen(&marker.raw_text, &link, 1);
                    self.observer.frame_extracted(&marker, &frame);
                    outcomes.push(MarkerOutcome::Substituted { marker, frame, link });
                }
                Err(reason) => {
                    self.observer.marker_failed(&marker, &reason);
                    outcomes.push(MarkerOutcome::Failed { marker, reason });
                }
            }
        }

        let report = SubstitutionReport { document, outcomes };
        self.observer.finished(&report);
        report
    }
}
