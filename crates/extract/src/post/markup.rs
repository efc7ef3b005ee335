use async_trait::async_trait;
use once_cell::sync::Lazy;
use redlens_types::post::Post;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tokio_util::sync::CancellationToken;

use super::{PostRequest, PostStrategy};
use crate::{client::Client, error::Error};

/// Digits with an optional decimal part and an optional `k` suffix.
static COUNT_LIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\d*[kK]?$").unwrap());

const IMAGE_SELECTOR: &str = r#"img[src*="preview.redd.it"]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    PublishedTime,
    Score,
    CommentCount,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    Text,
    Attr(&'static str),
    /// The attribute if present and non-empty, otherwise the text.
    AttrOrText(&'static str),
    /// Text accepted only when it looks like a count.
    CountLike,
    /// Count-like text whose enclosing span pair sits directly in a button.
    CountInButton,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub selector: &'static str,
    pub extract: Extract,
}

const fn rule(field: Field, selector: &'static str, extract: Extract) -> FieldRule {
    FieldRule {
        field,
        selector,
        extract,
    }
}

pub const FIELD_RULES: &[FieldRule] = &[
    rule(Field::Title, "h1", Extract::Text),
    rule(Field::Author, "faceplate-hovercard faceplate-tracker a", Extract::Text),
    rule(Field::PublishedTime, "faceplate-timeago time", Extract::AttrOrText("datetime")),
    rule(
        Field::Score,
        r#"shreddit-post div[class*="flex"] span span span faceplate-number"#,
        Extract::Text,
    ),
    rule(Field::Score, "faceplate-number", Extract::CountLike),
    rule(
        Field::CommentCount,
        "shreddit-post > div:nth-of-type(3) button span span:nth-of-type(2) faceplate-number",
        Extract::Text,
    ),
    rule(Field::CommentCount, "button span span faceplate-number", Extract::CountInButton),
    rule(Field::Content, "shreddit-post-text-body p", Extract::Text),
    rule(Field::Content, "shreddit-post-text-body div", Extract::Text),
    // the post element mirrors most fields as attributes
    rule(Field::Title, "shreddit-post", Extract::Attr("post-title")),
    rule(Field::Author, "shreddit-post", Extract::Attr("author")),
    rule(Field::PublishedTime, "shreddit-post", Extract::Attr("created-timestamp")),
    rule(Field::Score, "shreddit-post", Extract::Attr("score")),
    rule(Field::CommentCount, "shreddit-post", Extract::Attr("comment-count")),
];

/// Scrapes the page at the post URL itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupStrategy;

#[async_trait]
impl PostStrategy for MarkupStrategy {
    fn name(&self) -> &'static str {
        "markup"
    }

    async fn extract(
        &self,
        client: &Client,
        request: &PostRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<Post, Error> {
        let html = client
            .get_text(request.url, client.config().html_user_agent(), cancel)
            .await?;
        Ok(scrape(&html, FIELD_RULES))
    }
}

/// Applies `rules` in order to a rendered post page. Never fails; fields no
/// rule matched stay empty.
pub fn scrape(html: &str, rules: &[FieldRule]) -> Post {
    let doc = Html::parse_document(html);
    let mut post = Post::default();

    for rule in rules {
        let slot = field_mut(&mut post, rule.field);
        if !slot.is_empty() {
            continue;
        }
        let Ok(selector) = Selector::parse(rule.selector) else {
            continue;
        };
        if let Some(value) = doc
            .select(&selector)
            .find_map(|el| apply(el, rule.extract).filter(|v| !v.is_empty()))
        {
            *slot = value;
        }
    }

    post.images = scrape_images(&doc);
    post
}

fn field_mut(post: &mut Post, field: Field) -> &mut String {
    match field {
        Field::Title => &mut post.title,
        Field::Author => &mut post.author,
        Field::PublishedTime => &mut post.published_time,
        Field::Score => &mut post.score,
        Field::CommentCount => &mut post.comment_count,
        Field::Content => &mut post.content,
    }
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn attr_of(el: ElementRef, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn apply(el: ElementRef, extract: Extract) -> Option<String> {
    match extract {
        Extract::Text => Some(text_of(el)),
        Extract::Attr(name) => attr_of(el, name),
        Extract::AttrOrText(name) => attr_of(el, name).or_else(|| Some(text_of(el))),
        Extract::CountLike => Some(text_of(el)).filter(|t| COUNT_LIKE_RE.is_match(t)),
        Extract::CountInButton => Some(text_of(el))
            .filter(|t| COUNT_LIKE_RE.is_match(t))
            .filter(|_| ancestor_is(el, 2, "button")),
    }
}

/// Whether the `nth` ancestor (0 is the parent) is a `tag` element.
fn ancestor_is(el: ElementRef, nth: usize, tag: &str) -> bool {
    el.ancestors()
        .nth(nth)
        .and_then(ElementRef::wrap)
        .map_or(false, |a| a.value().name() == tag)
}

fn scrape_images(doc: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(IMAGE_SELECTOR) else {
        return vec![];
    };
    doc.select(&selector)
        .filter_map(|el| el.value().attr("src"))
        .filter(|src| !src.is_empty() && !src.contains("avatar"))
        .map(str::to_string)
        .collect()
}
