use std::sync::Mutex;

use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ValidationFailed {
        url: String,
        reason: String,
    },
    Fetching {
        url: String,
    },
    StrategyFailed {
        strategy: &'static str,
        reason: String,
    },
    StrategyRejected {
        strategy: &'static str,
    },
    PostExtracted {
        strategy: &'static str,
        comments: usize,
    },
    ForumUnavailable {
        forum: String,
        status: u16,
    },
    EntryFiltered {
        forum: String,
        title: String,
    },
    InvalidPermalink {
        title: String,
        permalink: String,
    },
    EntrySkipped {
        reason: String,
    },
    CommentSkipped {
        reason: String,
    },
    RepliesCollapsed {
        count: u64,
    },
    ListingComplete {
        forum: String,
        returned: usize,
        filtered: usize,
        has_more: bool,
        next_after: String,
    },
}

pub trait EventSink: Send + Sync + std::fmt::Debug {
    fn record(&self, event: &Event);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &Event) {
        match event {
            Event::ValidationFailed { url, reason } => {
                info!(url = %url, reason = %reason, "validation error")
            }
            Event::Fetching { url } => debug!(url = %url, "fetching"),
            Event::StrategyFailed { strategy, reason } => {
                warn!(strategy, reason = %reason, "strategy failed")
            }
            Event::StrategyRejected { strategy } => {
                debug!(strategy, "strategy returned no title")
            }
            Event::PostExtracted { strategy, comments } => {
                info!(strategy, comments, "post extracted")
            }
            Event::ForumUnavailable { forum, status } => {
                info!(forum = %forum, status, "subreddit unavailable")
            }
            Event::EntryFiltered { forum, title } => {
                debug!(forum = %forum, title = %title, "removed post filtered")
            }
            Event::InvalidPermalink { title, permalink } => {
                warn!(title = %title, permalink = %permalink, "invalid permalink filtered")
            }
            Event::EntrySkipped { reason } => debug!(reason = %reason, "listing entry skipped"),
            Event::CommentSkipped { reason } => debug!(reason = %reason, "comment skipped"),
            Event::RepliesCollapsed { count } => debug!(count, "collapsed replies not expanded"),
            Event::ListingComplete {
                forum,
                returned,
                filtered,
                has_more,
                next_after,
            } => info!(
                forum = %forum,
                returned,
                filtered,
                has_more,
                next_after = %next_after,
                "listing extracted"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &Event) {}
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
