pub mod api;
pub mod markup;

use async_trait::async_trait;
use redlens_types::post::Post;
use tokio_util::sync::CancellationToken;

use crate::{
    client::Client,
    error::Error,
    sink::Event,
    validate::{parse_post_url, PostTarget},
};

/// A post together with where it was requested from.
#[derive(Debug, Clone)]
pub struct PostRequest<'a> {
    pub url: &'a str,
    pub target: PostTarget,
}

#[async_trait]
pub trait PostStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        client: &Client,
        request: &PostRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<Post, Error>;
}

/// Whether a strategy's result is good enough to stop the chain.
pub fn is_acceptable(post: &Post) -> bool {
    post.has_title()
}

pub fn default_strategies() -> Vec<Box<dyn PostStrategy>> {
    vec![Box::new(api::ApiStrategy), Box::new(markup::MarkupStrategy)]
}

pub async fn extract(client: &Client, url: &str, cancel: &CancellationToken) -> Result<Post, Error> {
    run_chain(client, url, &default_strategies(), cancel).await
}

pub async fn run_chain(
    client: &Client,
    url: &str,
    strategies: &[Box<dyn PostStrategy>],
    cancel: &CancellationToken,
) -> Result<Post, Error> {
    let target = parse_post_url(url).map_err(|e| {
        client.record(Event::ValidationFailed {
            url: url.to_string(),
            reason: e.message.clone(),
        });
        e
    })?;
    let request = PostRequest { url, target };

    let mut last = Ok(Post::default());
    for strategy in strategies {
        last = strategy.extract(client, &request, cancel).await;
        match &last {
            Ok(post) if is_acceptable(post) => {
                client.record(Event::PostExtracted {
                    strategy: strategy.name(),
                    comments: post.comment_tree_len(),
                });
                break;
            }
            Ok(_) => client.record(Event::StrategyRejected {
                strategy: strategy.name(),
            }),
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => client.record(Event::StrategyFailed {
                strategy: strategy.name(),
                reason: e.to_string(),
            }),
        }
    }
    last
}
