//! Shared types handed from the loader to every generator.
//!
//! Posts are built once per build from the current state of the articles
//! directory and are never mutated afterwards.

use chrono::NaiveDate;
use serde::Serialize;

/// One published article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Text of the leading `# ` heading; empty when the article has none.
    pub title: String,
    /// Filename stem, date prefix included. Used as `<slug>.html`.
    pub slug: String,
    /// Parsed from the `YYYY-MM-DD` filename prefix.
    pub publish_date: NaiveDate,
    /// Trusted HTML from the block parser, rendered unescaped.
    pub content_html: String,
    /// Inline HTML of the first plain paragraph, used as feed summary.
    pub excerpt: String,
}

/// All valid posts, newest first.
///
/// Posts sharing a publish date keep the order they were discovered in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PostCollection(Vec<Post>);

impl PostCollection {
    /// Sort `posts` by publish date, descending. The sort is stable.
    pub fn from_unsorted(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        Self(posts)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent post, if any.
    pub fn newest(&self) -> Option<&Post> {
        self.0.first()
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.0.iter().find(|p| p.slug == slug)
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
