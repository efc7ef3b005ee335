pub mod client;
pub mod comments;
pub mod endpoint;
pub mod error;
pub mod listing;
pub mod post;
pub mod sink;
pub mod validate;

pub use client::{Client, Config};
pub use error::{Error, ValidationError};
pub use listing::ListingRequest;
pub use validate::{validate_forum_url, validate_post_url};
