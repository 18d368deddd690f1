/*!
 * # shotnote - Screenshots for transcript notes
 *
 * A Rust library that turns a subtitle-derived Markdown transcript into a
 * finished note by replacing `Screenshot-HH:MM:SS` markers with images
 * captured from the accompanying video.
 *
 * ## Features
 *
 * - Detect `Screenshot-HH:MM:SS` and `Screenshot-[HH:MM:SS]` markers
 * - Capture one frame per marker with ffmpeg
 * - Replace markers in document order, one occurrence at a time
 * - Keep markers whose capture failed, and report why
 * - Leave the document untouched when no video is available
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `markers`: Marker detection and offset computation
 * - `frame_extractor`: Frame capture through ffmpeg
 * - `substitution`: Replacement of markers by image links
 * - `observer`: Progress and logging hooks for the substitution engine
 * - `file_utils`: Input discovery and note writing
 * - `app_controller`: End-to-end processing of a working directory
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod frame_extractor;
pub mod markers;
pub mod observer;
pub mod substitution;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, FrameError};
pub use frame_extractor::{ExtractedFrame, FfmpegFrameExtractor, FrameExtractor};
pub use markers::{HourPolicy, Marker, MarkerExtractor};
pub use observer::{LogObserver, NullObserver, SubstitutionObserver};
pub use substitution::{MarkerOutcome, SubstitutionEngine, SubstitutionReport};
