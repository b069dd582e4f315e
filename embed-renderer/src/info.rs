//! Plain-text poll and gallery details for private replies.

use crate::classify::ClassifiedSubmission;
use crate::gallery::gallery_image_urls;
use crate::poll::{poll_snapshot, ACTIVE_POLL_MESSAGE};
use chrono::{DateTime, Utc};
use redditembed_core::CoreError;

pub fn format_gallery_info(classified: &ClassifiedSubmission<'_>) -> Result<String, CoreError> {
    let urls = gallery_image_urls(classified)
        .ok_or_else(|| CoreError::invalid_input("That submission is not a gallery"))?;
    Ok(urls
        .iter()
        .enumerate()
        .map(|(position, url)| format!("**{}**\n{}", position + 1, url))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn format_poll_info(classified: &ClassifiedSubmission<'_>) -> Result<String, CoreError> {
    format_poll_info_at(classified, Utc::now())
}

pub fn format_poll_info_at(
    classified: &ClassifiedSubmission<'_>,
    now: DateTime<Utc>,
) -> Result<String, CoreError> {
    let snapshot = poll_snapshot(classified)
        .ok_or_else(|| CoreError::invalid_input("That submission is not a poll"))?;
    if !snapshot.results_visible(now) {
        return Ok(ACTIVE_POLL_MESSAGE.to_string());
    }
    Ok(snapshot
        .options
        .iter()
        .enumerate()
        .map(|(position, option)| {
            format!("**{}**\n{}", option.text, snapshot.option_line(position, option))
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
