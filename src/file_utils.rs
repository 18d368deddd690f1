use anyhow::{Result, Context};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::AppError;

// @module: File and directory utilities

/// Inputs found in a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredInputs {
    /// Transcript to process
    pub document: PathBuf,
    /// Video to capture frames from, if any
    pub video: Option<PathBuf>,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension directly inside a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            // Case-sensitive and skipping dotfiles, like a shell glob
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == wanted) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Locate the transcript and the optional video in `dir`
    ///
    /// The first match in sorted order wins when several candidates exist.
    /// A missing document is fatal; a missing video is not.
    pub fn discover_inputs<P: AsRef<Path>>(
        dir: P,
        document_extension: &str,
        video_extension: &str,
    ) -> Result<DiscoveredInputs, AppError> {
        let dir = dir.as_ref();

        let documents = Self::find_files(dir, document_extension)?;
        let Some(document) = documents.first().cloned() else {
            return Err(AppError::NoDocument {
                dir: dir.to_path_buf(),
                extension: document_extension.trim_start_matches('.').to_string(),
            });
        };
        if documents.len() > 1 {
            warn!("Found {} .{} files, using the first one: {:?}", documents.len(), document_extension, document);
        }

        let videos = Self::find_files(dir, video_extension)?;
        let video = videos.first().cloned();
        match &video {
            Some(path) if videos.len() > 1 => {
                warn!("Found {} .{} files, using the first one: {:?}", videos.len(), video_extension, path);
            }
            Some(_) => {}
            None => {
                info!("No .{} file found, Screenshot markers will be kept unchanged.", video_extension);
            }
        }

        Ok(DiscoveredInputs { document, video })
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Persist the processed note as `<output_dir>/<name>.md`
    pub fn write_note<P: AsRef<Path>>(output_dir: P, name: &str, markdown: &str) -> Result<PathBuf> {
        let path = output_dir.as_ref().join(format!("{}.md", name));
        Self::write_to_file(&path, markdown)?;
        info!("Saved note: {:?}", path);
        Ok(path)
    }
}
