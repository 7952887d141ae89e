use std::sync::Arc;

use serde::Serialize;

use crate::context::Kind;

/// The classified context of one request.
///
/// `tags` accumulate from the most general classification to the most
/// specific, e.g. `["archive", "date", "month"]` or `["singular", "page",
/// "front-page"]`. The first tag always names the primary branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    pub kind: Kind,
    pub tags: Vec<Arc<str>>,
    pub title: String,
    /// May contain markup.
    pub description: String,
    /// `0` when there is no thumbnail.
    pub thumbnail_id: u64,
}

impl Context {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| &**t == tag)
    }

    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(|t| &**t)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| &**t)
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_id != 0
    }
}
