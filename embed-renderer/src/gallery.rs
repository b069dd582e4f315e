//! Gallery link listing.

use crate::classify::{ClassifiedSubmission, ContentShape};
use crate::embed::EmbedDescriptor;
use redditembed_core::text::strip_query;
use tracing::debug;

const ORDINALS: [&str; 20] = [
    "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
    "Twenty",
];

pub const LINKS_PER_ROW: usize = 5;

/// Link label for a zero-based gallery position. Positions past the word list
/// keep the last word.
pub fn ordinal_label(position: usize) -> &'static str {
    ORDINALS[position.min(ORDINALS.len() - 1)]
}

/// Direct image URLs in gallery order. Items without usable metadata are
/// skipped.
pub fn gallery_image_urls(classified: &ClassifiedSubmission<'_>) -> Option<Vec<String>> {
    if classified.shape() != ContentShape::Gallery {
        return None;
    }
    let submission = classified.submission();
    let items = submission.gallery_items.as_deref().unwrap_or_default();
    let metadata = submission.media_metadata.as_ref();

    let urls = items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let url = metadata
                .and_then(|metadata| metadata.get(&item.media_id))
                .and_then(|entry| entry.source_url.as_deref())
                .map(strip_query);
            if url.is_none() {
                debug!(
                    "Skipping gallery item {} ({}) of {}: no usable media",
                    position + 1,
                    item.media_id,
                    submission.id
                );
            }
            url
        })
        .collect();
    Some(urls)
}

pub fn gallery_url(id: &str) -> String {
    format!("https://www.reddit.com/gallery/{}", id)
}

pub fn render_gallery(classified: &ClassifiedSubmission<'_>) -> Option<EmbedDescriptor> {
    let urls = gallery_image_urls(classified)?;
    let submission = classified.submission();

    let description = urls
        .chunks(LINKS_PER_ROW)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(column, url)| {
                    format!("[{}]({})", ordinal_label(row * LINKS_PER_ROW + column), url)
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(
        EmbedDescriptor::new("Image Gallery")
            .url(gallery_url(&submission.id))
            .description(&description)
            .subreddit_footer(&submission.subreddit),
    )
}
