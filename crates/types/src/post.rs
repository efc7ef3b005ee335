use serde::{Deserialize, Serialize};

/// A single extracted post with its comment tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub author: String,
    /// `YYYY-MM-DD HH:MM:SS` when taken from the API, otherwise whatever the
    /// page exposed.
    pub published_time: String,
    pub score: String,
    pub comment_count: String,
    pub content: String,
    pub images: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    /// Total number of comments in the tree, replies included.
    pub fn comment_tree_len(&self) -> usize {
        self.comments.iter().map(Comment::tree_len).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(body: impl Into<String>, replies: Vec<Comment>) -> Self {
        Self {
            body: body.into(),
            replies,
        }
    }

    pub fn tree_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::tree_len).sum::<usize>()
    }
}
