use serde::{Deserialize, Serialize};

/// A post as it appears in a forum listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPost {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    /// Absolute link on the canonical domain.
    pub post_link: String,
    pub score: i64,
    pub comments: i64,
    /// Set only when the post targets another site.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_link: String,
}

/// One page of a forum listing. `has_more` always mirrors whether
/// `next_after` is non-empty; construct through [`ListingResponse::new`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub posts: Vec<ListingPost>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_after: String,
    pub has_more: bool,
}

impl ListingResponse {
    pub fn new(posts: Vec<ListingPost>, next_after: impl Into<String>) -> Self {
        let next_after = next_after.into().trim().to_string();
        Self {
            posts,
            has_more: !next_after.is_empty(),
            next_after,
        }
    }

    /// Terminal page with nothing in it.
    pub fn empty() -> Self {
        Self::new(vec![], "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tracing_test::traced_test]
    #[test]
    fn test_has_more_follows_cursor() {
        let resp = ListingResponse::new(vec![], "t3_abc");
        assert!(resp.has_more);
        assert_eq!(resp.next_after, "t3_abc");

        let resp = ListingResponse::new(vec![], "   ");
        assert!(!resp.has_more);
        assert!(resp.next_after.is_empty());

        let resp = ListingResponse::empty();
        assert!(!resp.has_more);
        assert!(resp.posts.is_empty());
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_cursor_is_trimmed() {
        let resp = ListingResponse::new(vec![], " t3_xyz \n");
        assert_eq!(resp.next_after, "t3_xyz");
        assert!(resp.has_more);
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_serialization_omits_empty_optionals() {
        let resp = ListingResponse::new(
            vec![ListingPost {
                title: "t".to_string(),
                post_link: "https://www.reddit.com/r/a/comments/b/c/".to_string(),
                ..Default::default()
            }],
            "",
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("next_after").is_none());
        assert_eq!(json["has_more"], false);
        let post = &json["posts"][0];
        assert!(post.get("image_urls").is_none());
        assert!(post.get("external_link").is_none());
        assert_eq!(post["score"], 0);
    }
}
