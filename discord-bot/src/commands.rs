//! Slash command definitions and the decisions behind their replies.

use embed_renderer::{format_gallery_info, format_poll_info, ClassifiedSubmission, ContentShape};
use redditembed_core::text::truncate_chars;
use redditembed_core::CoreError;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::{CommandDataOption, CommandOptionType};

pub const REDDIT_COMMAND: &str = "reddit";
pub const REDDIT_INFO_COMMAND: &str = "redditinfo";
pub const URL_OPTION: &str = "url";

pub const INVALID_URL_MESSAGE: &str = "Invalid URL";
pub const NSFW_REFUSAL_MESSAGE: &str = "NSFW submissions must be in an NSFW channel";
pub const VIDEO_PLACEHOLDER_MESSAGE: &str = "Attempting video upload...";

/// Discord's cap on plain message content.
pub const MESSAGE_CONTENT_LIMIT: usize = 2000;

fn url_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, URL_OPTION, description).required(true)
}

pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(REDDIT_COMMAND)
            .description("Display a Reddit post")
            .add_option(url_option("URL of the Reddit post")),
        CreateCommand::new(REDDIT_INFO_COMMAND)
            .description("Privately list the images or poll results of a Reddit post")
            .add_option(url_option("URL of the Reddit post")),
    ]
}

/// The `url` argument of a command, if supplied as a string.
pub fn url_argument(options: &[CommandDataOption]) -> Option<&str> {
    options
        .iter()
        .find(|option| option.name == URL_OPTION)
        .and_then(|option| option.value.as_str())
}

/// Age-restricted submissions may only be shown in age-restricted channels.
pub fn nsfw_allowed(submission_over_18: bool, channel_nsfw: bool) -> bool {
    !submission_over_18 || channel_nsfw
}

/// Private text for `/redditinfo`: poll results or gallery links.
pub fn info_text(classified: &ClassifiedSubmission<'_>) -> Result<String, CoreError> {
    let text = match classified.shape() {
        ContentShape::Poll => format_poll_info(classified)?,
        ContentShape::Gallery => format_gallery_info(classified)?,
        ContentShape::SelfPost | ContentShape::Link | ContentShape::Image | ContentShape::Video => {
            return Err(CoreError::invalid_input(
                "That submission has no gallery or poll to show",
            ))
        }
    };
    Ok(clamp_content(&text))
}

pub fn clamp_content(text: &str) -> String {
    truncate_chars(text, MESSAGE_CONTENT_LIMIT)
}
