/*!
 * Progress reporting for the substitution pipeline.
 *
 * The engine never logs on its own; it reports to an observer handed in by
 * the caller. The CLI uses `LogObserver`, tests use `NullObserver` or their
 * own recording implementation.
 */

use log::{debug, info, warn};

use crate::errors::FrameError;
use crate::frame_extractor::ExtractedFrame;
use crate::markers::Marker;
use crate::substitution::SubstitutionReport;

/// Receives events from the substitution engine
pub trait SubstitutionObserver {
    /// No video was supplied; markers stay untouched
    fn video_missing(&self) {}

    /// Markers were scanned; called once before any capture
    fn markers_found(&self, _count: usize) {}

    /// A capture is about to start for the marker
    fn frame_requested(&self, _marker: &Marker) {}

    /// A capture succeeded and the marker was replaced
    fn frame_extracted(&self, _marker: &Marker, _frame: &ExtractedFrame) {}

    /// A capture failed and the marker was left as is
    fn marker_failed(&self, _marker: &Marker, _error: &FrameError) {}

    /// All markers were processed
    fn finished(&self, _report: &SubstitutionReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SubstitutionObserver for NullObserver {}

/// Observer that forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SubstitutionObserver for LogObserver {
    fn video_missing(&self) {
        info!("No video provided, keeping Screenshot markers unchanged.");
    }

    fn markers_found(&self, count: usize) {
        debug!("Found {} screenshot marker(s)", count);
    }

    fn frame_requested(&self, marker: &Marker) {
        debug!("Requesting frame for {} at {}s", marker.raw_text, marker.offset_seconds);
    }

    fn frame_extracted(&self, marker: &Marker, frame: &ExtractedFrame) {
        info!("Generated screenshot: time={}, file={:?}", marker.offset_seconds, frame.file_path);
    }

    fn marker_failed(&self, marker: &Marker, error: &FrameError) {
        warn!("Failed to generate screenshot ({}): {}", marker.raw_text, error);
    }

    fn finished(&self, report: &SubstitutionReport) {
        info!(
            "Screenshot processing finished: {} substituted, {} failed",
            report.substituted_count(),
            report.failed_count()
        );
    }
}
