use crate::models::{count_replies, RedditListing, RedditSubmissionData};
use crate::RedditApiClient;
use redditembed_core::{CoreError, RedditApiError, RedditConfig, Submission};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config() -> RedditConfig {
    RedditConfig {
        client_id: "test_client_id".to_string(),
        client_secret: "test_client_secret".to_string(),
        user_agent: "redditembed/0.1 by test_user".to_string(),
    }
}

fn submission_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "A test post",
        "selftext": "",
        "author": "test_author",
        "created_utc": 1_700_000_000.0,
        "permalink": format!("/r/rust/comments/{}/a_test_post/", id),
        "url": "https://i.redd.it/picture.png",
        "thumbnail": "https://b.thumbs.redditmedia.com/thumb.jpg?a=1&amp;b=2",
        "score": 4321,
        "num_comments": 12,
        "subreddit": "rust",
        "over_18": false,
        "all_awardings": [
            { "coin_price": 500, "count": 2 },
            { "coin_price": 1800, "count": 1 }
        ],
        "is_self": false,
        "post_hint": "image",
        "poll_data": null,
        "media": null,
        "secure_media": null
    })
}

fn listing(kind: &str, children: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "kind": "Listing",
        "data": {
            "children": children
                .into_iter()
                .map(|data| json!({ "kind": kind, "data": data }))
                .collect::<Vec<_>>(),
            "after": null,
            "before": null
        }
    })
}

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("reddit_client=debug")
        .with_test_writer()
        .try_init();
}

async fn mock_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test_token",
            "token_type": "bearer",
            "expires_in": 86400,
            "scope": "*"
        })))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> RedditApiClient {
    RedditApiClient::with_endpoints(
        &create_test_config(),
        &server.uri(),
        &format!("{}/api/v1/access_token", server.uri()),
    )
    .unwrap()
}

#[test]
fn test_client_creation() {
    let client = RedditApiClient::new(&create_test_config());
    assert!(client.is_ok());
    assert_eq!(client.unwrap().user_agent(), "redditembed/0.1 by test_user");
}

#[test]
fn test_submission_conversion() {
    let raw: RedditListing<RedditSubmissionData> =
        serde_json::from_value(listing("t3", vec![submission_json("abc123")])).unwrap();
    let submission: Submission = raw.data.children.into_iter().next().unwrap().data.into();

    assert_eq!(submission.id, "abc123");
    assert_eq!(submission.selftext, None);
    assert_eq!(submission.awards.len(), 2);
    assert_eq!(submission.awards[1].price, 1800);
    assert_eq!(
        submission.thumbnail.as_deref(),
        Some("https://b.thumbs.redditmedia.com/thumb.jpg?a=1&b=2")
    );
    assert_eq!(submission.created.timestamp(), 1_700_000_000);
    assert!(submission.video.is_none());
}

#[test]
fn test_placeholder_thumbnails_are_dropped() {
    for placeholder in ["nsfw", "spoiler", "self", "image", "default", ""] {
        let mut data = submission_json("nsfw01");
        data["thumbnail"] = json!(placeholder);
        let raw: RedditSubmissionData = serde_json::from_value(data).unwrap();
        let submission: Submission = raw.into();
        assert_eq!(submission.thumbnail, None, "thumbnail {:?}", placeholder);
    }
}

#[test]
fn test_poll_and_video_conversion() {
    let mut data = submission_json("poll01");
    data["is_self"] = json!(true);
    data["poll_data"] = json!({
        "total_vote_count": 10,
        "voting_end_timestamp": 1_700_000_000_000i64,
        "options": [
            { "text": "Yes", "vote_count": 7 },
            { "text": "No" }
        ]
    });
    data["secure_media"] = json!({
        "reddit_video": {
            "fallback_url": "https://v.redd.it/x/DASH_720.mp4?source=fallback",
            "dash_url": "https://v.redd.it/x/DASHPlaylist.mpd?a=1&amp;b=2",
            "duration": 42
        }
    });

    let raw: RedditSubmissionData = serde_json::from_value(data).unwrap();
    let submission = Submission::from(raw);

    let poll = submission.poll_data.unwrap();
    assert_eq!(poll.total_vote_count, 10);
    assert_eq!(poll.voting_end.timestamp(), 1_700_000_000);
    assert_eq!(poll.options[0].vote_count, Some(7));
    assert_eq!(poll.options[1].vote_count, None);

    let video = submission.video.unwrap();
    assert_eq!(video.duration_secs, 42);
    assert_eq!(
        video.dash_url.as_deref(),
        Some("https://v.redd.it/x/DASHPlaylist.mpd?a=1&b=2")
    );
}

#[test]
fn test_gallery_metadata_conversion() {
    let mut data = submission_json("gal001");
    data["is_gallery"] = json!(true);
    data["gallery_data"] = json!({ "items": [{ "media_id": "m1" }, { "media_id": "m2" }] });
    data["media_metadata"] = json!({
        "m1": { "status": "valid", "s": { "u": "https://preview.redd.it/m1.jpg?a=1&amp;b=2" } },
        "m2": { "status": "failed" }
    });

    let submission = Submission::from(serde_json::from_value::<RedditSubmissionData>(data).unwrap());
    let metadata = submission.media_metadata.unwrap();
    assert_eq!(submission.gallery_items.unwrap().len(), 2);
    assert_eq!(
        metadata["m1"].source_url.as_deref(),
        Some("https://preview.redd.it/m1.jpg?a=1&b=2")
    );
    assert_eq!(metadata["m2"].source_url, None);
}

#[test]
fn test_count_replies() {
    assert_eq!(count_replies(&json!("")), 0);
    let replies = json!({
        "kind": "Listing",
        "data": { "children": [
            { "kind": "t1", "data": {} },
            { "kind": "t1", "data": {} },
            { "kind": "more", "data": { "count": 5 } }
        ] }
    });
    assert_eq!(count_replies(&replies), 7);
}

#[tokio::test]
async fn test_fetch_submission() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .and(query_param("id", "t3_abc123"))
        .and(query_param("raw_json", "1"))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing("t3", vec![submission_json("abc123")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let submission = client
        .fetch_submission("https://www.reddit.com/r/rust/comments/abc123/a_test_post/")
        .await
        .unwrap();
    assert_eq!(submission.title, "A test post");
    assert_eq!(submission.score, 4321);

    // Second call reuses the cached token.
    client.fetch_submission("https://redd.it/abc123").await.unwrap();
    let token_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path() == "/api/v1/access_token")
        .count();
    assert_eq!(token_requests, 1);
}

#[tokio::test]
async fn test_fetch_submission_empty_listing() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing("t3", vec![])))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_submission("https://redd.it/gone00").await;
    match result {
        Err(CoreError::RedditApi(RedditApiError::PostNotFound { post_id })) => {
            assert_eq!(post_id, "gone00")
        }
        other => panic!("Expected PostNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_network() {
    init_test_logging();
    let server = MockServer::start().await;
    let result = client_for(&server).fetch_submission("https://example.com/x").await;
    assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_mapping() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .and(query_param("id", "t3_forbid"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .and(query_param("id", "t3_broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.fetch_submission("https://redd.it/forbid").await,
        Err(CoreError::RedditApi(RedditApiError::Forbidden { .. }))
    ));
    assert!(matches!(
        client.fetch_submission("https://redd.it/broken").await,
        Err(CoreError::RedditApi(RedditApiError::ServerError { status_code: 503 }))
    ));
}

#[tokio::test]
async fn test_token_failure() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_submission("https://redd.it/abc123").await;
    assert!(matches!(
        result,
        Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { .. }))
    ));
}

fn comment_json(id: &str, parent_id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "body": "Nice post",
        "author": "commenter",
        "permalink": format!("/r/rust/comments/abc123/a_test_post/{}/", id),
        "created_utc": 1_700_000_100.0,
        "parent_id": parent_id,
        "score": 17,
        "subreddit": "rust",
        "all_awardings": [],
        "replies": listing("t1", vec![json!({}), json!({})])
    })
}

#[tokio::test]
async fn test_fetch_comment() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/comments/abc123"))
        .and(query_param("comment", "def456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            listing("t3", vec![submission_json("abc123")]),
            listing("t1", vec![comment_json("def456", "t3_abc123")])
        ])))
        .mount(&server)
        .await;

    let comment = client_for(&server)
        .fetch_comment("https://www.reddit.com/r/rust/comments/abc123/a_test_post/def456/")
        .await
        .unwrap();
    assert_eq!(comment.id, "def456");
    assert!(comment.is_root);
    assert_eq!(comment.reply_count, 2);
    assert_eq!(comment.score, 17);
}

#[tokio::test]
async fn test_fetch_comment_missing() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/comments/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            listing("t3", vec![submission_json("abc123")]),
            listing("t1", vec![comment_json("other1", "t1_zzz")])
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client
            .fetch_comment("https://www.reddit.com/r/rust/comments/abc123/t/def456/")
            .await,
        Err(CoreError::RedditApi(RedditApiError::CommentNotFound { .. }))
    ));
    assert!(matches!(
        client
            .fetch_comment("https://www.reddit.com/r/rust/comments/abc123/t/")
            .await,
        Err(CoreError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_fetch_user() {
    init_test_logging();
    let server = MockServer::start().await;
    mock_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/user/test_author/about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "t2",
            "data": {
                "name": "test_author",
                "icon_img": "https://styles.redditmedia.com/icon.png?a=1&amp;b=2",
                "is_suspended": false
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/vanished/about"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client.fetch_user("test_author").await.unwrap();
    assert_eq!(
        user.icon_url.as_deref(),
        Some("https://styles.redditmedia.com/icon.png?a=1&b=2")
    );

    let missing = client.fetch_user("vanished").await.unwrap();
    assert_eq!(missing.name, "vanished");
    assert!(missing.icon_url.is_none());

    let deleted = client.fetch_user("[deleted]").await.unwrap();
    assert_eq!(deleted.name, "[deleted]");
}
