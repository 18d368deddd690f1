// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use shotnote::app_config::{Config, LogLevel};
use shotnote::errors::FrameError;
use shotnote::frame_extractor::ExtractedFrame;
use shotnote::markers::{HourPolicy, Marker};
use shotnote::observer::{LogObserver, SubstitutionObserver};
use shotnote::substitution::SubstitutionReport;
use shotnote::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for HourPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliHourPolicy {
    Discard,
    Include,
}

impl From<CliHourPolicy> for HourPolicy {
    fn from(cli_policy: CliHourPolicy) -> Self {
        match cli_policy {
            CliHourPolicy::Discard => HourPolicy::Discard,
            CliHourPolicy::Include => HourPolicy::Include,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for shotnote
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// shotnote - Screenshots for transcript notes
///
/// Replaces Screenshot-HH:MM:SS markers in a Markdown transcript with frames
/// captured from the video next to it.
#[derive(Parser, Debug)]
#[command(name = "shotnote")]
#[command(version)]
#[command(about = "Insert video screenshots into a Markdown transcript")]
#[command(long_about = "shotnote looks for a Markdown transcript (*.md) and a video (*.mp4) in the
working directory, captures a frame with ffmpeg for every Screenshot-HH:MM:SS or
Screenshot-[HH:MM:SS] marker, and writes the result to output/note_processed.md.
Screenshots are stored in output/assets. Without a video the markers are kept.

A JSON summary of the run is printed to stdout.

EXAMPLES:
    shotnote                                    # Process the current directory
    shotnote -d ~/notes/lecture-3               # Process another directory
    shotnote --hours include                    # Count hours in marker offsets
    shotnote completions bash > shotnote.bash   # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the transcript and video
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Configuration file path, used if it exists
    #[arg(short, long = "config", default_value = "shotnote.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// How the hour field of a marker contributes to its offset
    #[arg(long, value_enum)]
    hours: Option<CliHourPolicy>,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger);
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Log observer that also drives a progress bar over the markers
struct ProgressObserver {
    bar: ProgressBar,
    inner: LogObserver,
}

impl ProgressObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} screenshots ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        Self { bar, inner: LogObserver }
    }
}

impl SubstitutionObserver for ProgressObserver {
    fn video_missing(&self) {
        self.bar.finish_and_clear();
        self.inner.video_missing();
    }

    fn markers_found(&self, count: usize) {
        self.bar.set_length(count as u64);
        self.bar.suspend(|| self.inner.markers_found(count));
    }

    fn frame_requested(&self, marker: &Marker) {
        self.bar.set_message(marker.raw_text.clone());
        self.bar.suspend(|| self.inner.frame_requested(marker));
    }

    fn frame_extracted(&self, marker: &Marker, frame: &ExtractedFrame) {
        self.bar.suspend(|| self.inner.frame_extracted(marker, frame));
        self.bar.inc(1);
    }

    fn marker_failed(&self, marker: &Marker, error: &FrameError) {
        self.bar.suspend(|| self.inner.marker_failed(marker, error));
        self.bar.inc(1);
    }

    fn finished(&self, report: &SubstitutionReport) {
        self.bar.finish_and_clear();
        self.inner.finished(report);
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "shotnote", &mut std::io::stdout());
        return Ok(());
    }

    run(cli)
}

fn run(options: CommandLineOptions) -> Result<()> {
    let config_path = if options.config_path.is_relative() {
        options.dir.join(&options.config_path)
    } else {
        options.config_path.clone()
    };

    let mut config = Config::load_or_default(&config_path)?;
    debug!("Configuration loaded (file present: {})", config_path.is_file());

    // Override config with CLI options if provided
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    if let Some(hours) = options.hours {
        config.hour_policy = hours.into();
    }

    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    let observer = ProgressObserver::new();
    let summary = controller
        .run(&options.dir, &observer)
        .with_context(|| format!("Failed to process directory: {:?}", options.dir))?;

    info!("Screenshot processing complete");

    println!("{}", summary.to_json()?);

    Ok(())
}
