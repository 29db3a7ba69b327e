use crate::store::ObjectId;
use serde::{Deserialize, Serialize};

/// A blog post as it travels over the wire.
///
/// `id` is empty until the store assigns one on creation; afterwards it is the
/// 24 digit hex form of the post's [`ObjectId`] and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl Blog {
    /// Creates a post that has not been stored yet.
    pub fn new(
        author_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            author_id: author_id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Addresses one post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlogId {
    pub id: String,
}

impl BlogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Message without fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Empty;

/// A blog post as the document store keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogItem {
    /// `None` until inserted.
    pub id: Option<ObjectId>,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl BlogItem {
    /// Record for the writable fields of `blog`. The wire id is not copied.
    pub fn from_blog(blog: Blog) -> Self {
        Self {
            id: None,
            author_id: blog.author_id,
            title: blog.title,
            content: blog.content,
        }
    }

    pub fn to_blog(&self) -> Blog {
        Blog {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            author_id: self.author_id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}
