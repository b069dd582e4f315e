//! Raw Reddit JSON shapes and their conversion into the domain types.

use chrono::{DateTime, TimeZone, Utc};
use redditembed_core::{
    Award, Comment, GalleryItem, MediaMetadata, PollData, PollOption, RedditVideo, Redditor,
    Submission,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditAwardData {
    pub coin_price: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPollOptionData {
    pub text: String,
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPollData {
    #[serde(default)]
    pub total_vote_count: u64,
    /// Milliseconds since the epoch.
    pub voting_end_timestamp: i64,
    #[serde(default)]
    pub options: Vec<RedditPollOptionData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditGalleryItemData {
    pub media_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditGalleryData {
    pub items: Vec<RedditGalleryItemData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMediaSource {
    pub u: Option<String>,
    pub gif: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMediaMetadata {
    pub status: Option<String>,
    pub s: Option<RedditMediaSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditVideoData {
    pub fallback_url: String,
    pub dash_url: Option<String>,
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMediaData {
    pub reddit_video: Option<RedditVideoData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditSubmissionData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub author: String,
    pub created_utc: f64,
    pub permalink: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub score: i64,
    pub num_comments: u64,
    pub subreddit: String,
    pub over_18: bool,
    #[serde(default)]
    pub all_awardings: Vec<RedditAwardData>,
    pub is_self: bool,
    pub poll_data: Option<RedditPollData>,
    pub post_hint: Option<String>,
    pub is_gallery: Option<bool>,
    pub gallery_data: Option<RedditGalleryData>,
    pub media_metadata: Option<HashMap<String, RedditMediaMetadata>>,
    pub media: Option<RedditMediaData>,
    pub secure_media: Option<RedditMediaData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub author: String,
    pub permalink: String,
    pub created_utc: f64,
    pub parent_id: String,
    pub score: i64,
    pub subreddit: String,
    #[serde(default)]
    pub all_awardings: Vec<RedditAwardData>,
    /// Either an empty string or a nested listing.
    #[serde(default)]
    pub replies: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditUserData {
    pub name: String,
    pub icon_img: Option<String>,
    pub is_suspended: Option<bool>,
}

fn utc_from_secs(secs: f64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs as i64, 0).single().unwrap_or_default()
}

fn convert_awards(awards: Vec<RedditAwardData>) -> Vec<Award> {
    awards
        .into_iter()
        .map(|award| Award {
            price: award.coin_price,
            count: award.count,
        })
        .collect()
}

/// Reddit escapes `&` in URLs unless `raw_json=1` was requested.
fn unescape_url(url: String) -> String {
    url.replace("&amp;", "&")
}

/// Reddit fills `thumbnail` with words like `self`, `nsfw` or `spoiler` when
/// there is no image. Only real URLs survive.
fn thumbnail_url(thumbnail: Option<String>) -> Option<String> {
    thumbnail
        .filter(|t| t.starts_with("https://") || t.starts_with("http://"))
        .map(unescape_url)
}

impl From<RedditPollData> for PollData {
    fn from(poll: RedditPollData) -> Self {
        Self {
            total_vote_count: poll.total_vote_count,
            voting_end: Utc
                .timestamp_millis_opt(poll.voting_end_timestamp)
                .single()
                .unwrap_or_default(),
            options: poll
                .options
                .into_iter()
                .map(|option| PollOption {
                    text: option.text,
                    vote_count: option.vote_count,
                })
                .collect(),
        }
    }
}

impl From<RedditMediaMetadata> for MediaMetadata {
    fn from(metadata: RedditMediaMetadata) -> Self {
        let usable = metadata.status.as_deref().map_or(true, |s| s == "valid");
        Self {
            source_url: metadata
                .s
                .filter(|_| usable)
                .and_then(|source| source.u.or(source.gif))
                .map(unescape_url),
        }
    }
}

impl From<RedditSubmissionData> for Submission {
    fn from(post: RedditSubmissionData) -> Self {
        let video = post
            .media
            .and_then(|media| media.reddit_video)
            .or_else(|| post.secure_media.and_then(|media| media.reddit_video))
            .map(|video| RedditVideo {
                fallback_url: unescape_url(video.fallback_url),
                dash_url: video.dash_url.map(unescape_url),
                duration_secs: video.duration.unwrap_or(0),
            });

        Self {
            id: post.id,
            title: post.title,
            selftext: if post.selftext.is_empty() {
                None
            } else {
                Some(post.selftext)
            },
            author: post.author,
            created: utc_from_secs(post.created_utc),
            permalink: post.permalink,
            url: unescape_url(post.url),
            thumbnail: thumbnail_url(post.thumbnail),
            score: post.score,
            num_comments: post.num_comments,
            subreddit: post.subreddit,
            over_18: post.over_18,
            awards: convert_awards(post.all_awardings),
            is_self: post.is_self,
            poll_data: post.poll_data.map(PollData::from),
            post_hint: post.post_hint,
            is_gallery: post.is_gallery,
            gallery_items: post.gallery_data.map(|gallery| {
                gallery
                    .items
                    .into_iter()
                    .map(|item| GalleryItem {
                        media_id: item.media_id,
                    })
                    .collect()
            }),
            media_metadata: post.media_metadata.map(|metadata| {
                metadata
                    .into_iter()
                    .map(|(id, entry)| (id, MediaMetadata::from(entry)))
                    .collect()
            }),
            video,
        }
    }
}

/// Direct replies to a comment, counting collapsed "load more" stubs by the
/// number of replies they stand for.
pub fn count_replies(replies: &serde_json::Value) -> u64 {
    let Some(children) = replies
        .get("data")
        .and_then(|data| data.get("children"))
        .and_then(|children| children.as_array())
    else {
        return 0;
    };

    children
        .iter()
        .map(|child| match child.get("kind").and_then(|k| k.as_str()) {
            Some("t1") => 1,
            Some("more") => child
                .get("data")
                .and_then(|data| data.get("count"))
                .and_then(|count| count.as_u64())
                .unwrap_or(0),
            _ => 0,
        })
        .sum()
}

impl From<RedditCommentData> for Comment {
    fn from(comment: RedditCommentData) -> Self {
        Self {
            reply_count: count_replies(&comment.replies),
            is_root: comment.parent_id.starts_with("t3_"),
            id: comment.id,
            body: comment.body,
            author: comment.author,
            permalink: comment.permalink,
            created: utc_from_secs(comment.created_utc),
            score: comment.score,
            subreddit: comment.subreddit,
            awards: convert_awards(comment.all_awardings),
        }
    }
}

impl From<RedditUserData> for Redditor {
    fn from(user: RedditUserData) -> Self {
        Self {
            name: user.name,
            icon_url: user
                .icon_img
                .filter(|icon| !icon.is_empty())
                .map(unescape_url),
        }
    }
}
