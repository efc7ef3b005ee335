pub mod listing;
pub mod post;
pub mod thing;
pub mod utils;
