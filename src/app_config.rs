use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::markers::HourPolicy;

/// Application configuration module
/// This module handles loading and validating the settings that drive a run.
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Link prefix for screenshots, also the screenshot folder name
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Folder for the processed note, relative to the working directory
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name of the processed note, without extension
    #[serde(default = "default_note_name")]
    pub note_name: String,

    /// Extension of the transcript document to look for
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// Extension of the video to look for
    #[serde(default = "default_video_extension")]
    pub video_extension: String,

    /// Whether marker hours count toward the offset
    #[serde(default)]
    pub hour_policy: HourPolicy,

    /// Frame capture settings
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the ffmpeg frame capture
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FfmpegConfig {
    /// Executable name or path
    #[serde(default = "default_ffmpeg_binary")]
    pub binary: String,

    /// JPEG quality passed as `-q:v` (1 is best, 31 is worst)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Treat a non-zero ffmpeg exit status as a failed capture
    #[serde(default = "default_true")]
    pub check_exit_status: bool,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: default_ffmpeg_binary(),
            quality: default_quality(),
            check_exit_status: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_image_base_url() -> String {
    "assets".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_note_name() -> String {
    "note_processed".to_string()
}

fn default_document_extension() -> String {
    "md".to_string()
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_ffmpeg_binary() -> String {
    "ffmpeg".to_string()
}

fn default_quality() -> u8 {
    2
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load the config file if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.note_name.trim().is_empty() {
            return Err(anyhow!("Note name must not be empty"));
        }

        if self.note_name.contains(['/', '\\']) {
            return Err(anyhow!("Note name must be a plain file name: {}", self.note_name));
        }

        if self.document_extension.trim().is_empty() {
            return Err(anyhow!("Document extension must not be empty"));
        }

        if self.video_extension.trim().is_empty() {
            return Err(anyhow!("Video extension must not be empty"));
        }

        if self.ffmpeg.binary.trim().is_empty() {
            return Err(anyhow!("ffmpeg binary must not be empty"));
        }

        if !(1..=31).contains(&self.ffmpeg.quality) {
            return Err(anyhow!(
                "ffmpeg quality must be between 1 and 31, got {}",
                self.ffmpeg.quality
            ));
        }

        Ok(())
    }

    /// Directory the screenshots are written to, relative to the working directory
    pub fn screenshots_dir(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.image_base_url)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            image_base_url: default_image_base_url(),
            output_dir: default_output_dir(),
            note_name: default_note_name(),
            document_extension: default_document_extension(),
            video_extension: default_video_extension(),
            hour_policy: HourPolicy::default(),
            ffmpeg: FfmpegConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
