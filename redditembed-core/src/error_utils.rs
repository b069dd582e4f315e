use crate::error::*;
use tracing::{debug, error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::RedditApi(e) => {
                error!("Reddit API error details: {:?}", e);
            }
            CoreError::Video(e) => {
                error!("Video error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Video(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => "Could not reach Reddit. Please try again later.".to_string(),
            CoreError::InvalidInput { message } => message.clone(),
            CoreError::NotFound { resource } => format!("Could not find: {}", resource),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::RedditApi(_) => "REDDIT_API".to_string(),
            CoreError::Video(_) => "VIDEO".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::NotFound { .. } => "NOT_FOUND".to_string(),
            CoreError::Discord { .. } => "DISCORD".to_string(),
        }
    }
}

impl ErrorExt for RedditApiError {
    fn log_error(&self) -> &Self {
        error!("RedditApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("RedditApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } | RedditApiError::InvalidToken => {
                "The bot could not authenticate with Reddit.".to_string()
            }
            RedditApiError::Forbidden { .. } => {
                "That content is private or quarantined.".to_string()
            }
            RedditApiError::PostNotFound { .. } => {
                "The requested post could not be found.".to_string()
            }
            RedditApiError::CommentNotFound { .. } => {
                "The requested comment could not be found.".to_string()
            }
            RedditApiError::RequestTimeout => {
                "Request to Reddit timed out. Please try again.".to_string()
            }
            _ => "Reddit API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED".to_string(),
            RedditApiError::Forbidden { .. } => "REDDIT_FORBIDDEN".to_string(),
            RedditApiError::PostNotFound { .. } => "REDDIT_POST_NOT_FOUND".to_string(),
            RedditApiError::CommentNotFound { .. } => "REDDIT_COMMENT_NOT_FOUND".to_string(),
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN".to_string(),
            RedditApiError::RequestTimeout => "REDDIT_TIMEOUT".to_string(),
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE".to_string(),
            RedditApiError::ServerError { .. } => "REDDIT_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for VideoError {
    fn log_error(&self) -> &Self {
        error!("VideoError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("VideoError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            VideoError::ResourceExceeded { .. } => {
                "The video is too large to upload to Discord.".to_string()
            }
            VideoError::NoVideo => "That submission has no Reddit-hosted video.".to_string(),
            _ => "The video could not be uploaded.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            VideoError::UpstreamFetch { .. } => "VIDEO_UPSTREAM_FETCH".to_string(),
            VideoError::ResourceExceeded { .. } => "VIDEO_RESOURCE_EXCEEDED".to_string(),
            VideoError::RemuxFailed { .. } => "VIDEO_REMUX_FAILED".to_string(),
            VideoError::ManifestInvalid { .. } => "VIDEO_MANIFEST_INVALID".to_string(),
            VideoError::NoVideo => "VIDEO_NONE".to_string(),
            VideoError::Io(_) => "VIDEO_IO".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file not found at: {}", path)
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            _ => "Configuration error. Please check your settings.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs failures that end a request and produces the text shown for them.
///
/// Each reporter is tagged with the surface the error reached, so startup
/// failures and command failures can be told apart in the logs.
#[derive(Debug, Clone, Copy)]
pub struct ErrorReporter {
    surface: &'static str,
}

impl ErrorReporter {
    pub fn new(surface: &'static str) -> Self {
        Self { surface }
    }

    /// Log `error` in full and return the message for the user.
    pub fn report_error(&self, error: &CoreError) -> String {
        error.log_error();
        let message = error.user_friendly_message();
        info!(
            "[{}] Error code: {}, user message: {}",
            self.surface,
            error.error_code(),
            message
        );
        message
    }

    /// Log `error` as expected noise and return the message for the user.
    pub fn report_warning(&self, error: &CoreError) -> String {
        error.log_warn();
        let message = error.user_friendly_message();
        debug!("[{}] Warning code: {}", self.surface, error.error_code());
        message
    }
}
