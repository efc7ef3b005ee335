use async_trait::async_trait;
use redlens_types::{
    post::Post,
    thing::{kind, LinkData, Listing, Thing},
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{PostRequest, PostStrategy};
use crate::{
    client::Client, comments::parse_payload_comments, endpoint::Endpoint, error::Error,
    sink::EventSink,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the post-detail JSON endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiStrategy;

#[async_trait]
impl PostStrategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn extract(
        &self,
        client: &Client,
        request: &PostRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<Post, Error> {
        let endpoint = Endpoint::Post {
            forum: request.target.forum.clone(),
            id: request.target.id.clone(),
        };
        let url = endpoint.url(client.config().api_base())?;
        let body = client
            .get_text(url.as_str(), client.config().api_user_agent(), cancel)
            .await?;
        decode_post(&body, client.sink())
    }
}

/// Decodes a post-detail payload: a two element array of listings, the
/// first holding the post, the second its comments.
pub fn decode_post(body: &str, sink: &dyn EventSink) -> Result<Post, Error> {
    let payload: Vec<Value> = serde_json::from_str(body)?;

    let mut post = payload
        .iter()
        .filter_map(|raw| serde_json::from_value::<Thing<Listing<Value>>>(raw.clone()).ok())
        .filter(|listing| listing.is(kind::LISTING))
        .flat_map(|listing| listing.data.children)
        .filter_map(|child| serde_json::from_value::<Thing<LinkData>>(child).ok())
        .find(|child| child.is(kind::LINK))
        .map(|link| post_from_link(&link.data))
        .unwrap_or_default();

    post.comments = parse_payload_comments(&payload, sink);
    Ok(post)
}

fn post_from_link(data: &LinkData) -> Post {
    let images = if data.is_gallery && !data.media_metadata.is_empty() {
        data.gallery_images()
    } else if data.has_direct_image() {
        vec![data.url.clone()]
    } else {
        vec![]
    };
    Post {
        title: data.title.clone(),
        author: data.author.clone(),
        published_time: format_created(data.created_utc),
        score: data.score.to_string(),
        comment_count: data.num_comments.to_string(),
        content: data.selftext.clone(),
        images,
        comments: vec![],
    }
}

fn format_created(created_utc: f64) -> String {
    if created_utc <= 0.0 {
        return String::new();
    }
    chrono::DateTime::from_timestamp(created_utc as i64, 0)
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;

    const PAYLOAD: &str = r#"[
      {"kind": "Listing", "data": {"after": null, "children": [
        {"kind": "t3", "data": {
          "title": "Ed Valigursky II",
          "author": "retro_fan",
          "created_utc": 1700000000.0,
          "score": 1234,
          "num_comments": 56,
          "selftext": "",
          "url": "https://i.redd.it/abc.jpg",
          "is_gallery": false
        }}
      ]}},
      {"kind": "Listing", "data": {"after": null, "children": [
        {"kind": "t1", "data": {"body": "Great art", "replies": {"kind": "Listing", "data": {"children": [
          {"kind": "t1", "data": {"body": "Agreed", "replies": ""}},
          {"kind": "t1", "data": {"body": "Same", "replies": ""}}
        ]}}}},
        {"kind": "more", "data": {"count": 3, "children": ["x", "y"]}}
      ]}}
    ]"#;

    #[tracing_test::traced_test]
    #[test]
    fn test_decode_post() {
        let post = decode_post(PAYLOAD, &NullSink).unwrap();
        assert_eq!(post.title, "Ed Valigursky II");
        assert_eq!(post.author, "retro_fan");
        assert_eq!(post.published_time, "2023-11-14 22:13:20");
        assert_eq!(post.score, "1234");
        assert_eq!(post.comment_count, "56");
        assert_eq!(post.images, vec!["https://i.redd.it/abc.jpg".to_string()]);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].body, "Great art");
        assert_eq!(post.comments[0].replies.len(), 2);
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_decode_gallery_post() {
        let payload = r#"[
          {"kind": "Listing", "data": {"children": [
            {"kind": "t3", "data": {
              "title": "gallery",
              "is_gallery": true,
              "url": "https://www.reddit.com/gallery/xyz",
              "media_metadata": {
                "a1": {"status": "valid", "e": "Image", "s": {"u": "https://preview.redd.it/a1.jpg?width=1&amp;s=x"}},
                "b2": {"status": "unprocessed", "e": "Image", "s": {"u": "https://preview.redd.it/b2.jpg"}}
              }
            }}
          ]}},
          {"kind": "Listing", "data": {"children": []}}
        ]"#;
        let post = decode_post(payload, &NullSink).unwrap();
        assert_eq!(
            post.images,
            vec!["https://preview.redd.it/a1.jpg?width=1&s=x".to_string()]
        );
        assert!(post.comments.is_empty());
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_non_image_url_has_no_images() {
        let payload = r#"[{"kind": "Listing", "data": {"children": [
            {"kind": "t3", "data": {"title": "link", "url": "https://example.com/article"}}
        ]}}]"#;
        let post = decode_post(payload, &NullSink).unwrap();
        assert!(post.images.is_empty());
        assert!(post.published_time.is_empty());
        assert_eq!(post.score, "0");
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_missing_post_yields_empty_title() {
        let post =
            decode_post(r#"[{"kind": "Listing", "data": {"children": []}}]"#, &NullSink).unwrap();
        assert!(post.title.is_empty());
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_malformed_payload_is_a_decode_error() {
        let err = decode_post("<html>rate limited</html>", &NullSink).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        let err = decode_post(r#"{"kind": "Listing"}"#, &NullSink).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
