//! Slash-command front end that turns Reddit links into Discord embeds.

pub mod commands;
pub mod convert;
pub mod handler;

pub use convert::build_embed;
pub use handler::RedditEmbedHandler;
