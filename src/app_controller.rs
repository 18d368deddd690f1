use anyhow::{Result, Context};
use log::{info, debug};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::frame_extractor::{FfmpegFrameExtractor, FrameExtractor};
use crate::observer::SubstitutionObserver;
use crate::substitution::SubstitutionEngine;

// @module: Application controller for note processing

/// What a run produced, printed as JSON by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Path of the written note
    pub output: PathBuf,
    /// Folder the screenshots were written to
    pub screenshots_dir: PathBuf,
    /// Video the frames came from, if one was found
    pub video_used_for_screenshot: Option<PathBuf>,
}

impl RunSummary {
    /// Pretty JSON for stdout
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { config })
    }

    /// Process the transcript in `working_dir` using ffmpeg for frames
    pub fn run<P: AsRef<Path>>(&self, working_dir: P, observer: &dyn SubstitutionObserver) -> Result<RunSummary, AppError> {
        let extractor = FfmpegFrameExtractor::from_config(&self.config.ffmpeg);
        self.run_with_extractor(working_dir, extractor, observer)
    }

    /// Process the transcript in `working_dir` with a given frame extractor
    pub fn run_with_extractor<P: AsRef<Path>, E: FrameExtractor>(
        &self,
        working_dir: P,
        extractor: E,
        observer: &dyn SubstitutionObserver,
    ) -> Result<RunSummary, AppError> {
        let working_dir = working_dir.as_ref();

        let inputs = FileManager::discover_inputs(
            working_dir,
            &self.config.document_extension,
            &self.config.video_extension,
        )?;

        let markdown = FileManager::read_to_string(&inputs.document)?;
        info!("Read Markdown file: {:?}", inputs.document);

        let screenshots_dir = working_dir.join(self.config.screenshots_dir());
        debug!("Screenshot directory: {:?}", screenshots_dir);

        let engine = SubstitutionEngine::new(extractor, observer)
            .with_hour_policy(self.config.hour_policy);
        let processed = engine.substitute(
            &markdown,
            inputs.video.as_deref(),
            &screenshots_dir,
            &self.config.image_base_url,
        );

        let output = FileManager::write_note(
            working_dir.join(&self.config.output_dir),
            &self.config.note_name,
            &processed,
        )?;

        Ok(RunSummary {
            output: display_path(working_dir, output),
            screenshots_dir: display_path(working_dir, screenshots_dir),
            video_used_for_screenshot: inputs.video.map(|video| display_path(working_dir, video)),
        })
    }
}

/// Drop the `./` prefix when running in the current directory
fn display_path(working_dir: &Path, path: PathBuf) -> PathBuf {
    if working_dir != Path::new(".") {
        return path;
    }
    match path.strip_prefix(working_dir) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}
