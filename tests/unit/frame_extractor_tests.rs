/*!
 * Tests for ffmpeg frame capture using stand-in scripts
 */

#![cfg(unix)]

use std::path::Path;
use anyhow::Result;
use shotnote::errors::FrameError;
use shotnote::frame_extractor::{FfmpegFrameExtractor, FrameExtractor};
use shotnote::observer::NullObserver;
use shotnote::substitution::SubstitutionEngine;
use crate::common;

// Output path is the ninth argument: -ss N -i VIDEO -frames:v 1 -q:v Q OUT -y
const WRITES_FRAME: &str = "printf jpeg > \"$9\"";
const FAILS_LOUDLY: &str = "echo 'ffmpeg version 6.0' >&2\necho 'talk.mp4: No such file or directory' >&2\nexit 1";
const WRITES_FRAME_THEN_FAILS: &str = "printf jpeg > \"$9\"\nexit 1";
// Seeking past the end of a video: success status, no image
const SILENT_SUCCESS: &str = "exit 0";

#[test]
fn test_extractFrame_withSuccessfulTool_shouldReturnFrameAtDeterministicPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-ok", WRITES_FRAME)?;
    let assets = temp_dir.path().join("output").join("assets");
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);

    let frame = extractor.extract_frame(Path::new("talk.mp4"), &assets, 192)?;

    assert_eq!(frame.offset_seconds, 192);
    assert_eq!(frame.file_path, assets.join("screenshot_03_12.jpg"));
    assert!(frame.file_path.is_file());
    Ok(())
}

#[test]
fn test_extractFrame_sameOffsetTwice_shouldOverwriteSameFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-ok", WRITES_FRAME)?;
    let assets = temp_dir.path().join("assets");
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);

    let first = extractor.extract_frame(Path::new("talk.mp4"), &assets, 65)?;
    let second = extractor.extract_frame(Path::new("talk.mp4"), &assets, 65)?;

    assert_eq!(first.file_path, second.file_path);
    assert_eq!(std::fs::read_dir(&assets)?.count(), 1);
    Ok(())
}

#[test]
fn test_extractFrame_withFailingTool_shouldReportExitStatusAndFilteredStderr() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-fail", FAILS_LOUDLY)?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);

    let result = extractor.extract_frame(Path::new("talk.mp4"), temp_dir.path(), 10);

    match result {
        Err(FrameError::ToolFailed { status, stderr }) => {
            assert_eq!(status.code(), Some(1));
            assert_eq!(stderr, "talk.mp4: No such file or directory");
        }
        other => panic!("Expected ToolFailed, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_extractFrame_ignoringExitStatus_shouldAcceptFileWrittenByFailingTool() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-partial", WRITES_FRAME_THEN_FAILS)?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, false);

    let frame = extractor.extract_frame(Path::new("talk.mp4"), temp_dir.path(), 7)?;

    assert!(frame.file_path.is_file());
    Ok(())
}

#[test]
fn test_extractFrame_ignoringExitStatus_withoutFile_shouldReportMissingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-fail", FAILS_LOUDLY)?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, false);

    let result = extractor.extract_frame(Path::new("talk.mp4"), temp_dir.path(), 7);

    assert!(matches!(result, Err(FrameError::MissingOutput(_))));
    Ok(())
}

#[test]
fn test_extractFrame_withOutputDirBlockedByFile_shouldReportCreateOutputDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(temp_dir.path(), "assets", "not a directory")?;
    let extractor = FfmpegFrameExtractor::default();

    let result = extractor.extract_frame(Path::new("talk.mp4"), &blocker.join("nested"), 7);

    assert!(matches!(result, Err(FrameError::CreateOutputDir { .. })));
    Ok(())
}

#[test]
fn test_extractFrame_withStaleFileAndSilentTool_shouldReportMissingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-silent", SILENT_SUCCESS)?;
    let assets = temp_dir.path().join("assets");
    std::fs::create_dir_all(&assets)?;
    let stale = common::create_test_file(&assets, "screenshot_03_12.jpg", "old frame")?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);

    let result = extractor.extract_frame(Path::new("talk.mp4"), &assets, 192);

    assert!(matches!(result, Err(FrameError::MissingOutput(_))));
    assert!(!stale.exists());
    Ok(())
}

#[test]
fn test_substitute_withStaleFileAndSilentTool_shouldKeepMarker() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-silent", SILENT_SUCCESS)?;
    let assets = temp_dir.path().join("assets");
    std::fs::create_dir_all(&assets)?;
    common::create_test_file(&assets, "screenshot_03_12.jpg", "old frame")?;
    let video = common::create_test_file(temp_dir.path(), "talk.mp4", "")?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);
    let engine = SubstitutionEngine::new(&extractor, &NullObserver);

    let result = engine.substitute("x Screenshot-00:03:12", Some(video.as_path()), &assets, "assets");

    assert_eq!(result, "x Screenshot-00:03:12");
    Ok(())
}

#[test]
fn test_extractFrame_withUnremovableStaleOutput_shouldReportRemoveStaleOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool = common::create_fake_ffmpeg(temp_dir.path(), "ffmpeg-ok", WRITES_FRAME)?;
    let assets = temp_dir.path().join("assets");
    // A directory where the screenshot should go cannot be removed as a file
    std::fs::create_dir_all(assets.join("screenshot_00_07.jpg"))?;
    let extractor = FfmpegFrameExtractor::new(tool, 2, true);

    let result = extractor.extract_frame(Path::new("talk.mp4"), &assets, 7);

    assert!(matches!(result, Err(FrameError::RemoveStaleOutput { .. })));
    Ok(())
}
