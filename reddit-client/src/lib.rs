pub mod api;
pub mod models;
pub mod url;

#[cfg(test)]
mod tests;

pub use api::RedditApiClient;
pub use url::{RedditUrl, RedditUrlError};
