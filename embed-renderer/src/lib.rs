pub mod awards;
pub mod classify;
pub mod embed;
pub mod gallery;
pub mod info;
pub mod interval;
pub mod poll;
pub mod render;

#[cfg(test)]
mod test_support;

pub use classify::{ClassifiedSubmission, ContentShape};
pub use embed::{EmbedAuthor, EmbedDescriptor, EmbedField, EmbedFooter, EmbedLimit};
pub use gallery::render_gallery;
pub use info::{format_gallery_info, format_poll_info};
pub use poll::{render_poll, PollSnapshot};
pub use render::{render_comment, render_secondary, render_submission, render_video};
