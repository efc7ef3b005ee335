use redlens_types::{
    listing::{ListingPost, ListingResponse},
    thing::{kind, LinkData, Listing, Thing},
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    client::Client,
    endpoint::Endpoint,
    error::{Error, ValidationError},
    sink::Event,
    validate::parse_forum_url,
};

/// Origin every produced post link lives on.
pub const CANONICAL_ORIGIN: &str = "https://www.reddit.com";

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

const REMOVED_SENTINELS: [&str; 2] = ["[deleted]", "[removed]"];

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Sort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl Sort {
    /// Empty input maps to the default sort.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "hot" => Ok(Self::Hot),
            "new" => Ok(Self::New),
            "top" => Ok(Self::Top),
            "rising" => Ok(Self::Rising),
            _ => Err(ValidationError::new("invalid sort")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

/// Raw caller input for one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    pub url: String,
    pub sort: String,
    pub time_range: String,
    /// 0 selects the default of 20.
    pub limit: i64,
    pub after: String,
}

impl ListingRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn time_range(mut self, time_range: impl Into<String>) -> Self {
        self.time_range = time_range.into();
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = after.into();
        self
    }

    /// Resolves the request into the endpoint to fetch.
    pub fn validate(&self) -> Result<Endpoint, ValidationError> {
        let forum = parse_forum_url(&self.url)?;
        let sort = Sort::parse(&self.sort)?;
        let limit = match self.limit {
            0 => DEFAULT_LIMIT,
            n if (1..=i64::from(MAX_LIMIT)).contains(&n) => n as u32,
            _ => {
                return Err(ValidationError::new(format!(
                    "limit must be between 1 and {}",
                    MAX_LIMIT
                )))
            }
        };
        // the range only applies to top
        let time_range = match (sort, self.time_range.trim()) {
            (Sort::Top, raw) if !raw.is_empty() => Some(
                TimeRange::parse(raw).ok_or_else(|| ValidationError::new("invalid time_range"))?,
            ),
            _ => None,
        };
        let after = Some(self.after.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        Ok(Endpoint::Listing {
            forum,
            sort,
            limit,
            after,
            time_range,
        })
    }
}

pub async fn extract(
    client: &Client,
    request: &ListingRequest,
    cancel: &CancellationToken,
) -> Result<ListingResponse, Error> {
    let endpoint = request.validate().map_err(|e| {
        client.record(Event::ValidationFailed {
            url: request.url.clone(),
            reason: e.message.clone(),
        });
        e
    })?;
    let forum = endpoint.forum().to_string();
    let url = endpoint.url(client.config().api_base())?;

    let resp = client
        .send(url.as_str(), client.config().api_user_agent(), cancel)
        .await?;
    match resp.status() {
        reqwest::StatusCode::OK => {}
        status @ (reqwest::StatusCode::FORBIDDEN
        | reqwest::StatusCode::NOT_FOUND
        | reqwest::StatusCode::GONE) => {
            // private, banned or nonexistent: a terminal empty page
            client.record(Event::ForumUnavailable {
                forum,
                status: status.as_u16(),
            });
            return Ok(ListingResponse::empty());
        }
        status => return Err(Error::StatusCode(status.as_u16())),
    }
    let body = client.read_text(resp, cancel).await?;
    let listing: Thing<Listing<Value>> = serde_json::from_str(&body)?;

    let mut posts = Vec::with_capacity(listing.data.children.len());
    let mut filtered = 0;
    for child in listing.data.children {
        let entry: Thing<LinkData> = match serde_json::from_value(child) {
            Ok(entry) => entry,
            Err(e) => {
                client.record(Event::EntrySkipped {
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !entry.is(kind::LINK) {
            continue;
        }
        let data = entry.data;
        if is_removed(&data) {
            filtered += 1;
            client.record(Event::EntryFiltered {
                forum: forum.clone(),
                title: data.title,
            });
            continue;
        }
        let post_link = build_post_link(&data.permalink);
        if post_link.is_empty() {
            client.record(Event::InvalidPermalink {
                title: data.title,
                permalink: data.permalink,
            });
            continue;
        }
        posts.push(ListingPost {
            image_urls: collect_images(&data),
            external_link: external_link(&data.url),
            title: data.title,
            post_link,
            score: data.score,
            comments: data.num_comments,
        });
    }

    let response = ListingResponse::new(posts, listing.data.after);
    client.record(Event::ListingComplete {
        forum,
        returned: response.posts.len(),
        filtered,
        has_more: response.has_more,
        next_after: response.next_after.clone(),
    });
    Ok(response)
}

/// A post is dropped when a removal category is set or its title or body is
/// one of the deletion sentinels.
pub fn is_removed(data: &LinkData) -> bool {
    if !data.removed_by_category.trim().is_empty() {
        return true;
    }
    [&data.title, &data.selftext].iter().any(|text| {
        let text = text.trim().to_lowercase();
        REMOVED_SENTINELS.contains(&text.as_str())
    })
}

/// Turns a permalink into an absolute link on the canonical origin, or an
/// empty string when the permalink is unusable.
pub fn build_post_link(permalink: &str) -> String {
    let permalink = permalink.trim();
    let path = if permalink.starts_with("http://") || permalink.starts_with("https://") {
        match permalink.strip_prefix(CANONICAL_ORIGIN) {
            Some(path) if path.starts_with('/') => path,
            _ => return String::new(),
        }
    } else {
        permalink
    };
    if !path.starts_with("/r/") || path.contains("..") {
        return String::new();
    }
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    let non_empty = parts.iter().filter(|p| !p.is_empty()).count();
    if non_empty < 3 || parts[0] != "r" || parts[1].is_empty() {
        return String::new();
    }
    format!("{}{}", CANONICAL_ORIGIN, path)
}

/// Images for a listing entry, by priority: none for videos, then gallery
/// media, then a direct image URL, then preview images.
pub fn collect_images(data: &LinkData) -> Vec<String> {
    if data.is_video {
        return vec![];
    }
    let gallery = data.gallery_images();
    if !gallery.is_empty() {
        return gallery;
    }
    if (data.post_hint == "image" || data.has_direct_image()) && !data.url.trim().is_empty() {
        return vec![data.url.clone()];
    }
    data.preview_images()
}

fn is_first_party(host: &str) -> bool {
    ["reddit.com", "redd.it"]
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// The entry's URL when it points off-site, otherwise empty.
pub fn external_link(raw_url: &str) -> String {
    if raw_url.trim().is_empty() {
        return String::new();
    }
    let Ok(parsed) = Url::parse(raw_url) else {
        return String::new();
    };
    match parsed.host_str() {
        Some(host) if !host.is_empty() && !is_first_party(&host.to_ascii_lowercase()) => {
            raw_url.to_string()
        }
        _ => String::new(),
    }
}
