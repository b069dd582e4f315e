//! Size-gated download and remux of Reddit-hosted videos.

pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod remux;

pub use lock::{VideoUploadGuard, VideoUploadLock};
pub use manifest::{DashManifest, Representation};
pub use pipeline::{exceeds_limit, FetchOutcome, VideoFetcher};
pub use remux::{FfmpegRemuxer, Remuxer};
