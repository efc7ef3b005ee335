use url::Url;

use crate::listing::{Sort, TimeRange};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Endpoint {
    /// A post and its comment tree.
    Post { forum: String, id: String },
    /// One page of a forum listing.
    Listing {
        forum: String,
        sort: Sort,
        limit: u32,
        after: Option<String>,
        time_range: Option<TimeRange>,
    },
}

impl Endpoint {
    /// Full request URL against `base`, e.g. `https://www.reddit.com`.
    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?.join(&self.path())?;
        if let Self::Listing {
            limit,
            after,
            time_range,
            ..
        } = self
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(after) = after {
                query.append_pair("after", after);
            }
            if let Some(range) = time_range {
                query.append_pair("t", range.as_str());
            }
        }
        Ok(url)
    }

    pub fn forum(&self) -> &str {
        match self {
            Self::Post { forum, .. } | Self::Listing { forum, .. } => forum,
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Post { forum, id } => format!("/r/{}/comments/{}/.json", forum, id),
            Self::Listing { forum, sort, .. } => format!("/r/{}/{}.json", forum, sort.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.reddit.com";

    #[tracing_test::traced_test]
    #[test]
    fn test_post_url() {
        let endpoint = Endpoint::Post {
            forum: "golang".to_string(),
            id: "abc123".to_string(),
        };
        assert_eq!(
            endpoint.url(BASE).unwrap().as_str(),
            "https://www.reddit.com/r/golang/comments/abc123/.json"
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_listing_url() {
        let endpoint = Endpoint::Listing {
            forum: "golang".to_string(),
            sort: Sort::Top,
            limit: 25,
            after: Some("t3_x y".to_string()),
            time_range: Some(TimeRange::Week),
        };
        assert_eq!(
            endpoint.url(BASE).unwrap().as_str(),
            "https://www.reddit.com/r/golang/top.json?limit=25&after=t3_x+y&t=week"
        );

        let endpoint = Endpoint::Listing {
            forum: "golang".to_string(),
            sort: Sort::Hot,
            limit: 20,
            after: None,
            time_range: None,
        };
        assert_eq!(
            endpoint.url("http://127.0.0.1:8080").unwrap().as_str(),
            "http://127.0.0.1:8080/r/golang/hot.json?limit=20"
        );
    }
}
