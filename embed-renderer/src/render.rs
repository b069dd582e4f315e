//! Submission and comment embeds.

use crate::awards;
use crate::classify::{ClassifiedSubmission, ContentShape};
use crate::embed::EmbedDescriptor;
use crate::gallery::render_gallery;
use crate::poll::render_poll;
use redditembed_core::text::group_thousands;
use redditembed_core::{Awardable, Comment, Redditor};

pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Reddit's placeholder value for posts without a thumbnail.
pub const DEFAULT_THUMBNAIL: &str = "default";

pub fn permalink_url(permalink: &str) -> String {
    format!("{}{}", REDDIT_BASE_URL, permalink)
}

/// Message content for a link; angle brackets keep Discord from unfurling it.
pub fn suppressed_link(url: &str) -> String {
    format!("<{}>", url)
}

fn with_author(embed: EmbedDescriptor, author: &Redditor) -> EmbedDescriptor {
    embed.author(
        &format!("/u/{}", author.name),
        Some(format!("{}/u/{}", REDDIT_BASE_URL, author.name)),
        author.icon_url.clone(),
    )
}

fn with_awards(embed: EmbedDescriptor, awardable: &impl Awardable) -> EmbedDescriptor {
    let tally = awards::tally(awardable);
    if tally.is_empty() {
        return embed;
    }
    embed.field("Awards", &awards::format(&tally), true)
}

fn usable_thumbnail(thumbnail: Option<&str>) -> Option<String> {
    thumbnail
        .filter(|url| *url != DEFAULT_THUMBNAIL)
        .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
        .map(str::to_string)
}

/// Thumbnail shown on the main embed, if any.
pub fn submission_thumbnail(classified: &ClassifiedSubmission<'_>) -> Option<String> {
    match classified.shape() {
        ContentShape::Image | ContentShape::Video | ContentShape::SelfPost | ContentShape::Poll => {
            None
        }
        ContentShape::Link | ContentShape::Gallery => {
            usable_thumbnail(classified.submission().thumbnail.as_deref())
        }
    }
}

pub fn render_submission(
    classified: &ClassifiedSubmission<'_>,
    author: &Redditor,
) -> (String, EmbedDescriptor) {
    let submission = classified.submission();
    let shape = classified.shape();
    let safe_url = permalink_url(&submission.permalink);

    let mut embed = EmbedDescriptor::new(&submission.title)
        .url(safe_url.clone())
        .timestamp(submission.created);

    if shape.is_self_like() {
        embed = embed.description(submission.selftext.as_deref().unwrap_or_default());
    }

    embed = with_author(embed, author)
        .field("Score", &group_thousands(submission.score), true)
        .field(
            "Comments",
            &group_thousands(i64::try_from(submission.num_comments).unwrap_or(i64::MAX)),
            true,
        );
    embed = with_awards(embed, submission)
        .subreddit_footer(&submission.subreddit)
        .thumbnail(submission_thumbnail(classified))
        .image(match shape {
            ContentShape::Image => Some(submission.url.clone()),
            _ => None,
        });

    (suppressed_link(&safe_url), embed)
}

/// `H:MM:SS` from one hour upwards, `M:SS` below.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

pub fn render_video(classified: &ClassifiedSubmission<'_>) -> Option<EmbedDescriptor> {
    if classified.shape() != ContentShape::Video {
        return None;
    }
    let submission = classified.submission();
    let duration = submission
        .video
        .as_ref()
        .map(|video| video.duration_secs)
        .unwrap_or(0);

    Some(
        EmbedDescriptor::new("Reddit Video")
            .url(submission.url.clone())
            .field("Duration", &format_duration(duration), true)
            .subreddit_footer(&submission.subreddit)
            .thumbnail(usable_thumbnail(submission.thumbnail.as_deref())),
    )
}

/// The follow-up embed for shapes that have one.
pub fn render_secondary(classified: &ClassifiedSubmission<'_>) -> Option<EmbedDescriptor> {
    match classified.shape() {
        ContentShape::Poll => render_poll(classified),
        ContentShape::Gallery => render_gallery(classified),
        ContentShape::Video => render_video(classified),
        ContentShape::SelfPost | ContentShape::Link | ContentShape::Image => None,
    }
}

pub const ROOT_COMMENT_TITLE: &str = "Reddit Comment";
pub const REPLY_COMMENT_TITLE: &str = "Reddit Reply";

pub fn render_comment(comment: &Comment, author: &Redditor) -> (String, EmbedDescriptor) {
    let safe_url = permalink_url(&comment.permalink);
    let title = if comment.is_root {
        ROOT_COMMENT_TITLE
    } else {
        REPLY_COMMENT_TITLE
    };

    let embed = EmbedDescriptor::new(title)
        .url(safe_url.clone())
        .description_untruncated(comment.body.clone())
        .timestamp(comment.created);
    let embed = with_author(embed, author)
        .field("Score", &group_thousands(comment.score), true)
        .field(
            "Replies",
            &group_thousands(i64::try_from(comment.reply_count).unwrap_or(i64::MAX)),
            true,
        );
    let embed = with_awards(embed, comment).subreddit_footer(&comment.subreddit);

    (suppressed_link(&safe_url), embed)
}
