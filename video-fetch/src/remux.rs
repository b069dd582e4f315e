//! Combining separately downloaded audio and video streams.

use async_trait::async_trait;
use redditembed_core::VideoError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Muxes a video stream and an optional audio stream into one container.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(
        &self,
        video: &Path,
        audio: Option<&Path>,
        output: &Path,
    ) -> Result<(), VideoError>;

    fn name(&self) -> &'static str;
}

/// Remuxer backed by an external `ffmpeg` binary. Streams are copied, never
/// re-encoded.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    binary_path: PathBuf,
}

impl FfmpegRemuxer {
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Look for `ffmpeg` on `PATH`.
    pub fn from_path() -> Option<Self> {
        which::which("ffmpeg").ok().map(Self::new)
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn command(&self, video: &Path, audio: Option<&Path>, output: &Path) -> Command {
        let mut command = Command::new(&self.binary_path);
        command.args(["-loglevel", "quiet", "-y", "-i"]).arg(video);
        if let Some(audio) = audio {
            command.arg("-i").arg(audio);
        }
        command
            .args(["-c", "copy"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    async fn remux(
        &self,
        video: &Path,
        audio: Option<&Path>,
        output: &Path,
    ) -> Result<(), VideoError> {
        let status = self
            .command(video, audio, output)
            .status()
            .await
            .map_err(|e| VideoError::RemuxFailed {
                reason: format!("Failed to execute ffmpeg: {}", e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(VideoError::RemuxFailed {
                reason: format!("ffmpeg exited with {}", status),
            })
        }
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
