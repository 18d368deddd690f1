/*!
 * Frame capture through an external ffmpeg process.
 *
 * Each request seeks to an offset in the video and writes exactly one JPEG
 * frame to `screenshot_MM_SS.jpg` inside the screenshot directory. The same
 * offset always maps to the same file, so re-running overwrites earlier
 * captures.
 */

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::app_config::FfmpegConfig;
use crate::errors::FrameError;

/// An image captured from the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    /// Offset the frame was captured at
    pub offset_seconds: u64,
    /// Location of the image on disk
    pub file_path: PathBuf,
}

impl ExtractedFrame {
    /// File name of the image, used to build the asset link
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Something that can turn a video offset into an image file
pub trait FrameExtractor {
    /// Capture one frame of `video` at `offset_seconds` into `output_dir`
    fn extract_frame(
        &self,
        video: &Path,
        output_dir: &Path,
        offset_seconds: u64,
    ) -> Result<ExtractedFrame, FrameError>;
}

impl<T: FrameExtractor + ?Sized> FrameExtractor for &T {
    fn extract_frame(
        &self,
        video: &Path,
        output_dir: &Path,
        offset_seconds: u64,
    ) -> Result<ExtractedFrame, FrameError> {
        (**self).extract_frame(video, output_dir, offset_seconds)
    }
}

/// Deterministic file name for a frame at the given offset
pub fn screenshot_filename(offset_seconds: u64) -> String {
    let minutes = offset_seconds / 60;
    let seconds = offset_seconds % 60;
    format!("screenshot_{:02}_{:02}.jpg", minutes, seconds)
}

/// Frame extractor backed by the ffmpeg command line tool
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    binary: PathBuf,
    quality: u8,
    check_exit_status: bool,
}

impl Default for FfmpegFrameExtractor {
    fn default() -> Self {
        Self::from_config(&FfmpegConfig::default())
    }
}

impl FfmpegFrameExtractor {
    pub fn new<P: Into<PathBuf>>(binary: P, quality: u8, check_exit_status: bool) -> Self {
        Self {
            binary: binary.into(),
            quality,
            check_exit_status,
        }
    }

    pub fn from_config(config: &FfmpegConfig) -> Self {
        Self::new(&config.binary, config.quality, config.check_exit_status)
    }

    /// Arguments passed to ffmpeg for a single capture
    pub fn build_args(&self, video: &Path, output_path: &Path, offset_seconds: u64) -> Vec<String> {
        vec![
            "-ss".to_string(),
            offset_seconds.to_string(),
            "-i".to_string(),
            video.to_string_lossy().into_owned(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            self.quality.to_string(),
            output_path.to_string_lossy().into_owned(),
            "-y".to_string(),
        ]
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "lib",
            "Input #",
            "Metadata:",
            "Duration:",
            "Stream #",
            "major_brand",
            "minor_version",
            "compatible_brands",
            "encoder",
            "handler_name",
            "vendor_id",
            "creation_time",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "frame=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract_frame(
        &self,
        video: &Path,
        output_dir: &Path,
        offset_seconds: u64,
    ) -> Result<ExtractedFrame, FrameError> {
        fs::create_dir_all(output_dir).map_err(|source| FrameError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let output_path = output_dir.join(screenshot_filename(offset_seconds));

        // Only a file written by this invocation counts as a capture
        match fs::remove_file(&output_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(FrameError::RemoveStaleOutput { path: output_path, source });
            }
        }

        // Blocks until ffmpeg exits; no timeout
        let output = Command::new(&self.binary)
            .args(self.build_args(video, &output_path, offset_seconds))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FrameError::BinaryNotFound(self.binary.clone()),
                _ => FrameError::Spawn(e),
            })?;

        if self.check_exit_status && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FrameError::ToolFailed {
                status: output.status,
                stderr: Self::filter_ffmpeg_stderr(&stderr),
            });
        }

        if !output_path.is_file() {
            return Err(FrameError::MissingOutput(output_path));
        }

        Ok(ExtractedFrame {
            offset_seconds,
            file_path: output_path,
        })
    }
}
