use chrono::{DateTime, TimeZone, Utc};
use redditembed_core::{
    Comment, GalleryItem, MediaMetadata, PollData, PollOption, RedditVideo, Redditor, Submission,
};
use std::collections::HashMap;

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
}

/// A plain link post on r/rust.
pub fn submission() -> Submission {
    Submission {
        id: "abc123".to_string(),
        title: "Test Post".to_string(),
        selftext: Some(String::new()),
        author: "test_user".to_string(),
        created: created_at(),
        permalink: "/r/rust/comments/abc123/test_post/".to_string(),
        url: "https://example.com/article".to_string(),
        thumbnail: Some("https://b.thumbs.redditmedia.com/thumb.jpg".to_string()),
        score: 1234,
        num_comments: 56,
        subreddit: "rust".to_string(),
        over_18: false,
        awards: Vec::new(),
        is_self: false,
        poll_data: None,
        post_hint: None,
        is_gallery: None,
        gallery_items: None,
        media_metadata: None,
        video: None,
    }
}

pub fn self_submission(body: &str) -> Submission {
    let mut post = submission();
    post.is_self = true;
    post.selftext = Some(body.to_string());
    post.url = format!("https://www.reddit.com{}", post.permalink);
    post.thumbnail = Some("self".to_string());
    post
}

pub fn poll_submission(voting_end: DateTime<Utc>, options: Vec<(&str, Option<u64>)>) -> Submission {
    let mut post = self_submission("Which one?");
    let total = options.iter().filter_map(|(_, votes)| *votes).sum();
    post.poll_data = Some(PollData {
        total_vote_count: total,
        voting_end,
        options: options
            .into_iter()
            .map(|(text, vote_count)| PollOption {
                text: text.to_string(),
                vote_count,
            })
            .collect(),
    });
    post
}

pub fn gallery_submission(count: usize) -> Submission {
    let mut post = submission();
    post.is_gallery = Some(true);
    post.url = "https://www.reddit.com/gallery/abc123".to_string();
    let mut metadata = HashMap::new();
    let mut items = Vec::new();
    for i in 0..count {
        let media_id = format!("media{}", i);
        metadata.insert(
            media_id.clone(),
            MediaMetadata {
                source_url: Some(format!(
                    "https://preview.redd.it/{}.jpg?width=640&format=pjpg&s=sig{}",
                    media_id, i
                )),
            },
        );
        items.push(GalleryItem { media_id });
    }
    post.gallery_items = Some(items);
    post.media_metadata = Some(metadata);
    post
}

pub fn video_submission(duration_secs: u64) -> Submission {
    let mut post = submission();
    post.post_hint = Some("hosted:video".to_string());
    post.url = "https://v.redd.it/vid123".to_string();
    post.video = Some(RedditVideo {
        fallback_url: "https://v.redd.it/vid123/DASH_720.mp4?source=fallback".to_string(),
        dash_url: Some("https://v.redd.it/vid123/DASHPlaylist.mpd".to_string()),
        duration_secs,
    });
    post
}

pub fn comment() -> Comment {
    Comment {
        id: "c0mm3nt".to_string(),
        body: "Great post!".to_string(),
        author: "commenter".to_string(),
        permalink: "/r/rust/comments/abc123/test_post/c0mm3nt/".to_string(),
        created: created_at(),
        is_root: true,
        score: 42,
        reply_count: 3,
        subreddit: "rust".to_string(),
        awards: Vec::new(),
    }
}

pub fn author() -> Redditor {
    Redditor {
        name: "test_user".to_string(),
        icon_url: Some("https://styles.redditmedia.com/icon.png".to_string()),
    }
}
