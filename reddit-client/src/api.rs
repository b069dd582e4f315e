use crate::models::{
    RedditCommentData, RedditListing, RedditListingChild, RedditSubmissionData, RedditUserData,
};
use crate::url::RedditUrl;
use oauth2::basic::BasicTokenResponse;
use oauth2::TokenResponse;
use redditembed_core::{
    Comment, CoreError, RedditApiError, RedditConfig, Redditor, Submission,
};
use reqwest::{Client, Method, Response};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens are refreshed this long before Reddit would expire them.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Application-only OAuth client for reading public Reddit content.
#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    api_base: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditApiClient {
    pub fn new(config: &RedditConfig) -> Result<Self, CoreError> {
        Self::with_endpoints(config, REDDIT_API_BASE, REDDIT_TOKEN_URL)
    }

    /// Point the client at alternative API and token endpoints.
    pub fn with_endpoints(
        config: &RedditConfig,
        api_base: &str,
        token_url: &str,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            user_agent: config.user_agent.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
            token: Mutex::new(None),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn access_token(&self) -> Result<String, CoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting new application token");
        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Token request failed with status: {}", response.status());
            return Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: format!("token endpoint returned {}", response.status()),
            }));
        }

        let token: BasicTokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: "malformed token response".to_string(),
            })
        })?;

        let lifetime = token.expires_in().unwrap_or(Duration::from_secs(3600));
        let access_token = token.access_token().secret().clone();
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        info!("Obtained Reddit application token valid for {:?}", lifetime);
        Ok(access_token)
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", self.api_base, endpoint);
        let access_token = self.access_token().await?;

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(&access_token)
            .query(&[("raw_json", "1")]);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        match status.as_u16() {
            401 => {
                // Force a fresh token on the next call.
                *self.token.lock().await = None;
                Err(CoreError::RedditApi(RedditApiError::InvalidToken))
            }
            403 => Err(CoreError::RedditApi(RedditApiError::Forbidden {
                resource: endpoint.to_string(),
            })),
            404 => Err(CoreError::NotFound {
                resource: endpoint.to_string(),
            }),
            code if status.is_server_error() => {
                Err(CoreError::RedditApi(RedditApiError::ServerError { status_code: code }))
            }
            code => Err(CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("unexpected status {}", code),
            })),
        }
    }

    /// Resolve a submission link. Comment links resolve to their submission.
    pub async fn fetch_submission(&self, url: &str) -> Result<Submission, CoreError> {
        let reddit_url = RedditUrl::parse(url)?;
        self.fetch_submission_by_id(&reddit_url.submission_id).await
    }

    pub async fn fetch_submission_by_id(&self, id: &str) -> Result<Submission, CoreError> {
        let fullname = format!("t3_{}", id);
        let response = self
            .make_request(Method::GET, "/api/info", Some(&[("id", fullname.as_str())]))
            .await?;

        let listing: RedditListing<RedditSubmissionData> = response.json().await.map_err(|e| {
            error!("Failed to parse submission {}: {}", id, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse submission {}", id),
            })
        })?;

        let post = listing
            .data
            .children
            .into_iter()
            .next()
            .ok_or_else(|| {
                CoreError::RedditApi(RedditApiError::PostNotFound {
                    post_id: id.to_string(),
                })
            })?
            .data;

        debug!("Retrieved submission {} from r/{}", post.id, post.subreddit);
        Ok(post.into())
    }

    /// Resolve a comment link. The URL must name a comment.
    pub async fn fetch_comment(&self, url: &str) -> Result<Comment, CoreError> {
        let reddit_url = RedditUrl::parse(url)?;
        let comment_id = reddit_url
            .comment_id
            .ok_or_else(|| CoreError::invalid_input("That link does not point to a comment"))?;
        self.fetch_comment_by_id(&reddit_url.submission_id, &comment_id)
            .await
    }

    pub async fn fetch_comment_by_id(
        &self,
        submission_id: &str,
        comment_id: &str,
    ) -> Result<Comment, CoreError> {
        let endpoint = format!("/comments/{}", submission_id);
        let response = self
            .make_request(
                Method::GET,
                &endpoint,
                Some(&[("comment", comment_id), ("depth", "2")]),
            )
            .await
            .map_err(|e| match e {
                CoreError::NotFound { .. } => {
                    CoreError::RedditApi(RedditApiError::CommentNotFound {
                        comment_id: comment_id.to_string(),
                    })
                }
                other => other,
            })?;

        let (_post, comments): (
            RedditListing<serde_json::Value>,
            RedditListing<serde_json::Value>,
        ) = response.json().await.map_err(|e| {
            error!("Failed to parse comment thread {}: {}", comment_id, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse comment {}", comment_id),
            })
        })?;

        let child = comments
            .data
            .children
            .into_iter()
            .find(|child| {
                child.kind == "t1"
                    && child.data.get("id").and_then(|id| id.as_str()) == Some(comment_id)
            })
            .ok_or_else(|| {
                CoreError::RedditApi(RedditApiError::CommentNotFound {
                    comment_id: comment_id.to_string(),
                })
            })?;

        let comment: RedditCommentData = serde_json::from_value(child.data)?;
        debug!("Retrieved comment {} from r/{}", comment.id, comment.subreddit);
        Ok(comment.into())
    }

    /// Look up a post or comment author. Missing accounts degrade to a bare
    /// name without an icon.
    pub async fn fetch_user(&self, name: &str) -> Result<Redditor, CoreError> {
        if name == "[deleted]" {
            return Ok(Redditor::deleted());
        }

        let endpoint = format!("/user/{}/about", name);
        let response = match self.make_request(Method::GET, &endpoint, None).await {
            Ok(response) => response,
            Err(CoreError::NotFound { .. })
            | Err(CoreError::RedditApi(RedditApiError::Forbidden { .. })) => {
                warn!("User {} is unavailable, rendering without profile", name);
                return Ok(Redditor {
                    name: name.to_string(),
                    icon_url: None,
                });
            }
            Err(e) => return Err(e),
        };

        let user: RedditListingChild<RedditUserData> = response.json().await.map_err(|e| {
            error!("Failed to parse user {}: {}", name, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse user {}", name),
            })
        })?;

        Ok(user.data.into())
    }
}
