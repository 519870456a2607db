//! FFmpeg-based tools implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::MediaTools;
use super::types::TARGET_FORMAT;

/// Drives the ffprobe and ffmpeg command line tools.
pub struct FfmpegTools {
    config: ConverterConfig,
}

impl FfmpegTools {
    /// Creates new tools with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Builds ffprobe arguments that print only the codec name of the first
    /// audio stream.
    fn build_probe_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "a:0",
            "-show_entries",
            "stream=codec_name",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_os_string());
        args
    }

    /// Builds ffmpeg arguments for the FLAC conversion.
    fn build_transcode_args(source: &Path, target: &Path) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("-y"), // Overwrite output
            OsString::from("-i"),
            source.as_os_str().to_os_string(),
        ];

        args.extend(
            ["-c:a", TARGET_FORMAT.ffmpeg_codec(), "-map_metadata", "0"]
                .iter()
                .map(OsString::from),
        );

        args.push(target.as_os_str().to_os_string());
        args
    }

    /// Extracts the codec name from ffprobe's bare output.
    fn parse_probe_output(output: &str) -> Result<String, ConverterError> {
        let line = output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| ConverterError::unparseable("ffprobe printed no audio stream"))?;

        if line.chars().any(char::is_whitespace) {
            return Err(ConverterError::unparseable(format!(
                "unexpected ffprobe output: {}",
                line
            )));
        }

        Ok(line.to_lowercase())
    }

    /// Runs `program` to completion, honoring the configured timeout.
    async fn run(
        &self,
        program: &Path,
        args: &[OsString],
        not_found: impl FnOnce(PathBuf) -> ConverterError,
    ) -> Result<Output, ConverterError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let result = match self.config.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), output).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ConverterError::Timeout {
                        program: program_name(program),
                        timeout_secs: secs,
                    })
                }
            },
            None => output.await,
        };

        result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found(program.to_path_buf())
            } else {
                ConverterError::Io(e)
            }
        })
    }
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string())
}

#[async_trait]
impl MediaTools for FfmpegTools {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe_codec(&self, path: &Path) -> Result<String, ConverterError> {
        let program = &self.config.ffprobe_path;
        let output = self
            .run(program, &Self::build_probe_args(path), |path| {
                ConverterError::FfprobeNotFound { path }
            })
            .await?;

        if !output.status.success() {
            return Err(ConverterError::non_zero_exit(
                program_name(program),
                output.status.code(),
                &output.stderr,
            ));
        }

        Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn transcode(&self, source: &Path, target: &Path) -> Result<(), ConverterError> {
        let program = &self.config.ffmpeg_path;
        let output = self
            .run(program, &Self::build_transcode_args(source, target), |path| {
                ConverterError::FfmpegNotFound { path }
            })
            .await?;

        if !output.status.success() {
            return Err(ConverterError::non_zero_exit(
                program_name(program),
                output.status.code(),
                &output.stderr,
            ));
        }

        Ok(())
    }
}
