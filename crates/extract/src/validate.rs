use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::ValidationError;

/// Path segment that introduces a forum name.
pub const FORUM_MARKER: &str = "r";

static POST_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/r/([^/]+)/comments/([a-z0-9]+)(?:/|$)").unwrap());

/// Forum and post id of a post-detail URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    pub forum: String,
    pub id: String,
}

fn parse_absolute(raw_url: &str) -> Result<Url, ValidationError> {
    if raw_url.trim().is_empty() {
        return Err(ValidationError::new("url is required"));
    }
    let parsed = Url::parse(raw_url).map_err(|_| ValidationError::new("invalid url"))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() && !parsed.scheme().is_empty() => Ok(parsed),
        _ => Err(ValidationError::new("invalid url")),
    }
}

/// Checks that `raw_url` is a non-empty absolute URL with a scheme and host.
pub fn validate_post_url(raw_url: &str) -> Result<(), ValidationError> {
    parse_absolute(raw_url).map(|_| ())
}

/// Checks that `raw_url` names a forum.
pub fn validate_forum_url(raw_url: &str) -> Result<(), ValidationError> {
    parse_forum_url(raw_url).map(|_| ())
}

/// Extracts forum and post id from `/r/<forum>/comments/<id>/...`.
pub fn parse_post_url(raw_url: &str) -> Result<PostTarget, ValidationError> {
    let parsed = parse_absolute(raw_url)?;
    let caps = POST_PATH_RE
        .captures(parsed.path())
        .ok_or_else(|| ValidationError::new("invalid post url"))?;
    Ok(PostTarget {
        forum: caps[1].to_string(),
        id: caps[2].to_string(),
    })
}

/// Returns the segment following the first `r` marker that has one.
pub fn parse_forum_url(raw_url: &str) -> Result<String, ValidationError> {
    let parsed = parse_absolute(raw_url)?;
    let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    segments
        .windows(2)
        .find(|pair| pair[0] == FORUM_MARKER && !pair[1].is_empty())
        .map(|pair| pair[1].to_string())
        .ok_or_else(|| ValidationError::new("invalid subreddit url"))
}
