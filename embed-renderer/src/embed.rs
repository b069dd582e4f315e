//! Platform-neutral embed description with Discord's size limits applied on
//! construction.

use chrono::{DateTime, Utc};
use redditembed_core::text::truncate_chars;
use serde::Serialize;
use tracing::warn;

/// Discord embed limits, in characters unless noted.
pub struct EmbedLimit;

impl EmbedLimit {
    pub const TITLE: usize = 256;
    pub const DESCRIPTION: usize = 2048;
    pub const FIELDS: usize = 25;
    pub const FIELD_NAME: usize = 256;
    pub const FIELD_VALUE: usize = 1024;
    pub const FOOTER_TEXT: usize = 2048;
    pub const AUTHOR_NAME: usize = 256;
}

/// Reddit orange-red, rgb(255, 69, 0).
pub const REDDIT_COLOR: u32 = 0xFF4500;

pub const REDDIT_ICON_URL: &str =
    "https://www.redditstatic.com/desktop2x/img/favicon/favicon-96x96.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedDescriptor {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl EmbedDescriptor {
    pub fn new(title: &str) -> Self {
        Self {
            title: truncate_chars(title, EmbedLimit::TITLE),
            url: None,
            description: None,
            color: REDDIT_COLOR,
            timestamp: None,
            author: None,
            fields: Vec::new(),
            footer: None,
            thumbnail: None,
            image: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the description, cut to the platform limit.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(truncate_chars(text, EmbedLimit::DESCRIPTION));
        self
    }

    /// Set the description verbatim; Discord trims it server side.
    pub fn description_untruncated(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn author(mut self, name: &str, url: Option<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: truncate_chars(name, EmbedLimit::AUTHOR_NAME),
            url,
            icon_url,
        });
        self
    }

    /// Append a field. Fields beyond the platform limit are dropped.
    pub fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        if self.fields.len() >= EmbedLimit::FIELDS {
            warn!(
                "Dropping embed field '{}': already at {} fields",
                name,
                EmbedLimit::FIELDS
            );
            return self;
        }
        self.fields.push(EmbedField {
            name: truncate_chars(name, EmbedLimit::FIELD_NAME),
            value: truncate_chars(value, EmbedLimit::FIELD_VALUE),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: &str, icon_url: Option<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: truncate_chars(text, EmbedLimit::FOOTER_TEXT),
            icon_url,
        });
        self
    }

    /// Standard `Reddit - /r/<name>` attribution footer.
    pub fn subreddit_footer(self, subreddit: &str) -> Self {
        self.footer(
            &format!("Reddit - /r/{}", subreddit),
            Some(REDDIT_ICON_URL.to_string()),
        )
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url;
        self
    }

    pub fn image(mut self, url: Option<String>) -> Self {
        self.image = url;
        self
    }
}
