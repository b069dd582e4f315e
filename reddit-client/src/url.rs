//! Recognising submission and comment links.

use redditembed_core::CoreError;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedditUrlError {
    #[error("not a URL: {0}")]
    Malformed(String),

    #[error("not a Reddit host: {0}")]
    ForeignHost(String),

    #[error("no submission id in path: {0}")]
    MissingId(String),
}

impl From<RedditUrlError> for CoreError {
    fn from(error: RedditUrlError) -> Self {
        tracing::debug!("Rejected URL: {}", error);
        CoreError::invalid_input("Invalid URL")
    }
}

/// Identifiers extracted from a Reddit link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditUrl {
    pub submission_id: String,
    pub comment_id: Option<String>,
}

fn is_reddit_id(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric())
}

impl RedditUrl {
    /// Accepts `reddit.com/r/<sub>/comments/<id>[/<slug>[/<comment>]]`,
    /// `reddit.com/comments/<id>` and `redd.it/<id>`, with or without scheme
    /// and on any reddit.com subdomain.
    pub fn parse(input: &str) -> Result<Self, RedditUrlError> {
        let trimmed = input.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(trimmed)
            .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
            .map_err(|_| RedditUrlError::Malformed(input.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RedditUrlError::Malformed(input.to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| RedditUrlError::Malformed(input.to_string()))?
            .to_ascii_lowercase();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if host == "redd.it" {
            return match segments.first() {
                Some(id) if is_reddit_id(id) => Ok(Self {
                    submission_id: id.to_string(),
                    comment_id: None,
                }),
                _ => Err(RedditUrlError::MissingId(input.to_string())),
            };
        }

        if host != "reddit.com" && !host.ends_with(".reddit.com") {
            return Err(RedditUrlError::ForeignHost(host));
        }

        let comments_at = segments
            .iter()
            .position(|segment| *segment == "comments")
            .ok_or_else(|| RedditUrlError::MissingId(input.to_string()))?;
        let submission_id = segments
            .get(comments_at + 1)
            .filter(|id| is_reddit_id(id))
            .ok_or_else(|| RedditUrlError::MissingId(input.to_string()))?
            .to_string();
        let comment_id = segments
            .get(comments_at + 3)
            .filter(|id| is_reddit_id(id))
            .map(|id| id.to_string());

        Ok(Self {
            submission_id,
            comment_id,
        })
    }

    pub fn is_comment(&self) -> bool {
        self.comment_id.is_some()
    }
}
