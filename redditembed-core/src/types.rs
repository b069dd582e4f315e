use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A single award entry: what one award costs and how many times it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub price: u64,
    pub count: u64,
}

/// Anything that can carry awards.
pub trait Awardable {
    fn awards(&self) -> &[Award];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    /// Reddit hides per-option counts while voting is open.
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollData {
    pub total_vote_count: u64,
    pub voting_end: DateTime<Utc>,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub media_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    /// Source image URL as stored by Reddit, query string included.
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditVideo {
    pub fallback_url: String,
    pub dash_url: Option<String>,
    pub duration_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub selftext: Option<String>,
    pub author: String,
    pub created: DateTime<Utc>,
    pub permalink: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub score: i64,
    pub num_comments: u64,
    pub subreddit: String,
    pub over_18: bool,
    pub awards: Vec<Award>,
    pub is_self: bool,
    pub poll_data: Option<PollData>,
    pub post_hint: Option<String>,
    pub is_gallery: Option<bool>,
    pub gallery_items: Option<Vec<GalleryItem>>,
    pub media_metadata: Option<HashMap<String, MediaMetadata>>,
    pub video: Option<RedditVideo>,
}

impl Awardable for Submission {
    fn awards(&self) -> &[Award] {
        &self.awards
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
    pub permalink: String,
    pub created: DateTime<Utc>,
    pub is_root: bool,
    pub score: i64,
    pub reply_count: u64,
    pub subreddit: String,
    pub awards: Vec<Award>,
}

impl Awardable for Comment {
    fn awards(&self) -> &[Award] {
        &self.awards
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redditor {
    pub name: String,
    pub icon_url: Option<String>,
}

impl Redditor {
    /// Placeholder used when an author account is deleted or suspended.
    pub fn deleted() -> Self {
        Self {
            name: "[deleted]".to_string(),
            icon_url: None,
        }
    }
}
