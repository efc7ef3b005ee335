use redlens_types::{
    post::Comment,
    thing::{kind, Listing, Thing},
    utils::null_default,
};
use serde::Deserialize;
use serde_json::Value;

use crate::sink::{Event, EventSink};

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    replies: Value,
    #[serde(default, deserialize_with = "null_default")]
    count: u64,
}

enum Replies {
    Listing(Vec<Value>),
    None,
}

impl Replies {
    fn probe(raw: Value) -> Result<Self, serde_json::Error> {
        match raw {
            Value::Object(_) => {
                let listing: Thing<Listing<Value>> = serde_json::from_value(raw)?;
                if listing.is(kind::LISTING) && !listing.data.children.is_empty() {
                    Ok(Self::Listing(listing.data.children))
                } else {
                    Ok(Self::None)
                }
            }
            // "" sentinel, null, or absent
            _ => Ok(Self::None),
        }
    }
}

/// Decodes a sequence of comment things into a tree. Nodes that are not
/// comments, or that fail to decode, are dropped without affecting siblings.
pub fn parse_comments(children: Vec<Value>, sink: &dyn EventSink) -> Vec<Comment> {
    children
        .into_iter()
        .filter_map(|child| parse_node(child, sink))
        .collect()
}

fn parse_node(raw: Value, sink: &dyn EventSink) -> Option<Comment> {
    let node: Thing<CommentData> = match serde_json::from_value(raw) {
        Ok(node) => node,
        Err(e) => {
            sink.record(&Event::CommentSkipped {
                reason: e.to_string(),
            });
            return None;
        }
    };
    if node.is(kind::MORE) {
        sink.record(&Event::RepliesCollapsed {
            count: node.data.count,
        });
        return None;
    }
    if !node.is(kind::COMMENT) {
        return None;
    }
    let replies = match Replies::probe(node.data.replies) {
        Ok(Replies::Listing(children)) => parse_comments(children, sink),
        Ok(Replies::None) => vec![],
        Err(e) => {
            sink.record(&Event::CommentSkipped {
                reason: format!("replies: {}", e),
            });
            vec![]
        }
    };
    Some(Comment::new(node.data.body.unwrap_or_default(), replies))
}

/// Parses the comment listing out of a whole post-detail payload, i.e. the
/// second element of the top-level array.
pub fn parse_payload_comments(payload: &[Value], sink: &dyn EventSink) -> Vec<Comment> {
    payload
        .get(1)
        .cloned()
        .and_then(|raw| serde_json::from_value::<Thing<Listing<Value>>>(raw).ok())
        .map(|listing| parse_comments(listing.data.children, sink))
        .unwrap_or_default()
}
