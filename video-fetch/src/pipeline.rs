//! Manifest-driven, size-gated video fetch.
//!
//! Each candidate quality is probed, downloaded alongside the audio track,
//! remuxed and size-checked. Scratch files are scoped to the submission id and
//! removed on every exit path.

use crate::lock::VideoUploadLock;
use crate::manifest::DashManifest;
use crate::remux::Remuxer;
use futures::StreamExt;
use redditembed_core::text::strip_query;
use redditembed_core::{CoreError, ErrorExt, RedditVideo, Submission, VideoConfig, VideoError};
use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Whether a file of `bytes` is too large to upload.
pub fn exceeds_limit(bytes: u64, limit: u64) -> bool {
    bytes > limit
}

/// How a call to [`VideoFetcher::fetch_video`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The success continuation received a muxed file built from this
    /// candidate.
    Delivered { candidate: String, bytes: u64 },
    /// The failure continuation ran.
    Exhausted,
}

/// A muxed output that passed the size check. Dropping it removes the file.
struct MuxedVideo {
    file: tokio::fs::File,
    path: TempPath,
    bytes: u64,
}

#[derive(Debug, Clone)]
struct ScratchPaths {
    video: PathBuf,
    audio: PathBuf,
    output: PathBuf,
}

impl ScratchPaths {
    fn for_submission(work_dir: &Path, submission_id: &str) -> Self {
        Self {
            video: work_dir.join(format!("{}_video.mp4", submission_id)),
            audio: work_dir.join(format!("{}_audio.mp4", submission_id)),
            output: work_dir.join(format!("{}.mp4", submission_id)),
        }
    }
}

pub struct VideoFetcher {
    http_client: Client,
    remuxer: Arc<dyn Remuxer>,
    work_dir: PathBuf,
    size_limit: u64,
}

impl VideoFetcher {
    pub fn new(
        config: &VideoConfig,
        user_agent: &str,
        remuxer: Arc<dyn Remuxer>,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Video fetcher remuxing with {} into {}, limit {} bytes",
            remuxer.name(),
            config.work_dir.display(),
            config.size_limit_bytes
        );
        Ok(Self {
            http_client,
            remuxer,
            work_dir: config.work_dir.clone(),
            size_limit: config.size_limit_bytes,
        })
    }

    /// Fetch the submission's video while holding `lock`, then run exactly
    /// one of the continuations.
    ///
    /// `on_success` receives the muxed file already open. The file is removed
    /// once the continuation's future completes. Nothing escapes as an error:
    /// every failure moves on to the next candidate and, once they are all
    /// spent, `on_failure` runs.
    pub async fn fetch_video<S, SFut, F, FFut>(
        &self,
        lock: &VideoUploadLock,
        submission: &Submission,
        on_success: S,
        on_failure: F,
    ) -> FetchOutcome
    where
        S: FnOnce(tokio::fs::File) -> SFut,
        SFut: Future<Output = ()>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = ()>,
    {
        let _guard = lock.acquire().await;

        let Some(video) = submission.video.as_ref() else {
            VideoError::NoVideo.log_warn();
            on_failure().await;
            return FetchOutcome::Exhausted;
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.work_dir).await {
            warn!("Cannot create video work dir {}: {}", self.work_dir.display(), e);
            on_failure().await;
            return FetchOutcome::Exhausted;
        }

        let (candidates, audio_url) = self.plan_candidates(video).await;
        let paths = ScratchPaths::for_submission(&self.work_dir, &submission.id);
        info!(
            "Fetching video for {} with {} candidate(s), audio: {}",
            submission.id,
            candidates.len(),
            audio_url.is_some()
        );

        for candidate in &candidates {
            match self
                .try_candidate(candidate, audio_url.as_deref(), &paths)
                .await
            {
                Ok(muxed) => {
                    info!("Delivering {} ({} bytes)", candidate, muxed.bytes);
                    let MuxedVideo { file, path, bytes } = muxed;
                    on_success(file).await;
                    drop(path);
                    return FetchOutcome::Delivered {
                        candidate: candidate.clone(),
                        bytes,
                    };
                }
                Err(VideoError::ResourceExceeded { bytes, limit }) => {
                    debug!("Skipping {}: {} bytes over limit {}", candidate, bytes, limit);
                }
                Err(e) => {
                    e.log_warn();
                }
            }
        }

        warn!("No video candidate fit for submission {}", submission.id);
        on_failure().await;
        FetchOutcome::Exhausted
    }

    /// Candidate video URLs, fallback first, plus the audio track if any.
    async fn plan_candidates(&self, video: &RedditVideo) -> (Vec<String>, Option<String>) {
        let fallback = strip_query(&video.fallback_url);

        let manifest = match video.dash_url.as_deref() {
            Some(dash_url) => match self.fetch_manifest(dash_url).await {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    e.log_warn();
                    None
                }
            },
            None => None,
        };

        let (mut candidates, audio_url) = match manifest {
            Some(manifest) => (
                manifest.video_candidates(),
                manifest.audio_url().map(str::to_string),
            ),
            None => (Vec::new(), None),
        };
        prioritise_fallback(&mut candidates, fallback);
        (candidates, audio_url)
    }

    async fn fetch_manifest(&self, dash_url: &str) -> Result<DashManifest, VideoError> {
        let response = self
            .http_client
            .get(dash_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| upstream(dash_url, e))?;
        let body = response.text().await.map_err(|e| upstream(dash_url, e))?;
        DashManifest::parse(&body, dash_url)
    }

    /// Estimated size from a HEAD request. Any failure counts as zero so a
    /// flaky probe never blocks an attempt.
    async fn probe_size(&self, url: &str) -> u64 {
        match self.http_client.head(url).send().await {
            Ok(response) if response.status().is_success() => response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(0),
            Ok(response) => {
                debug!("Size probe for {} returned {}", url, response.status());
                0
            }
            Err(e) => {
                debug!("Size probe for {} failed: {}", url, e);
                0
            }
        }
    }

    async fn try_candidate(
        &self,
        video_url: &str,
        audio_url: Option<&str>,
        paths: &ScratchPaths,
    ) -> Result<MuxedVideo, VideoError> {
        let estimate = self.probe_size(video_url).await;
        if exceeds_limit(estimate, self.size_limit) {
            return Err(VideoError::ResourceExceeded {
                bytes: estimate,
                limit: self.size_limit,
            });
        }

        let output = TempPath::try_from_path(&paths.output)?;
        {
            let video_input = TempPath::try_from_path(&paths.video)?;
            let audio_input = audio_url
                .map(|_| TempPath::try_from_path(&paths.audio))
                .transpose()?;

            let (video_result, audio_result) = tokio::join!(
                self.download_to(video_url, &video_input),
                async {
                    match (audio_url, audio_input.as_ref()) {
                        (Some(url), Some(path)) => self.download_to(url, path).await.map(Some),
                        _ => Ok(None),
                    }
                }
            );
            let video_bytes = video_result?;
            let audio_bytes = audio_result?;
            debug!(
                "Downloaded {} video bytes and {:?} audio bytes",
                video_bytes, audio_bytes
            );

            self.remuxer
                .remux(&video_input, audio_input.as_deref(), &output)
                .await?;
            // Inputs are removed here whatever the remux outcome.
        }

        let bytes = tokio::fs::metadata(&output).await?.len();
        if exceeds_limit(bytes, self.size_limit) {
            return Err(VideoError::ResourceExceeded {
                bytes,
                limit: self.size_limit,
            });
        }

        let file = tokio::fs::File::open(&output).await?;
        Ok(MuxedVideo {
            file,
            path: output,
            bytes,
        })
    }

    async fn download_to(&self, url: &str, path: &Path) -> Result<u64, VideoError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| upstream(url, e))?;

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| upstream(url, e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

fn upstream(url: &str, error: reqwest::Error) -> VideoError {
    VideoError::UpstreamFetch {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Put the fallback URL first, removing any later duplicate.
fn prioritise_fallback(candidates: &mut Vec<String>, fallback: String) {
    if candidates.first() == Some(&fallback) {
        return;
    }
    candidates.retain(|candidate| *candidate != fallback);
    candidates.insert(0, fallback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_limit_boundary() {
        assert!(!exceeds_limit(8_000_000, 8_000_000));
        assert!(exceeds_limit(8_000_001, 8_000_000));
        assert!(!exceeds_limit(0, 8_000_000));
    }

    #[test]
    fn test_fallback_prepended() {
        let mut candidates = vec!["https://v/720.mp4".to_string(), "https://v/480.mp4".to_string()];
        prioritise_fallback(&mut candidates, "https://v/360.mp4".to_string());
        assert_eq!(candidates[0], "https://v/360.mp4");
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_fallback_moved_to_front() {
        let mut candidates = vec!["https://v/720.mp4".to_string(), "https://v/480.mp4".to_string()];
        prioritise_fallback(&mut candidates, "https://v/480.mp4".to_string());
        assert_eq!(candidates, vec!["https://v/480.mp4", "https://v/720.mp4"]);

        prioritise_fallback(&mut candidates, "https://v/480.mp4".to_string());
        assert_eq!(candidates, vec!["https://v/480.mp4", "https://v/720.mp4"]);
    }

    #[test]
    fn test_scratch_paths_are_submission_scoped() {
        let paths = ScratchPaths::for_submission(Path::new("videos"), "abc123");
        assert_eq!(paths.video, Path::new("videos/abc123_video.mp4"));
        assert_eq!(paths.audio, Path::new("videos/abc123_audio.mp4"));
        assert_eq!(paths.output, Path::new("videos/abc123.mp4"));
    }
}
