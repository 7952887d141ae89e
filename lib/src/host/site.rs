use serde::{Deserialize, Serialize};

use crate::host::Options;

/// A stored content item: a post, a page, an attachment or any custom type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub slug: String,
    /// Hand-written summary. Never generated from the body.
    pub excerpt: String,
    pub post_type: String,
    /// Only meaningful for attachments, e.g. `image/jpeg`.
    pub mime_type: Option<String>,
    /// Post format such as `video` or `aside`.
    pub format: Option<String>,
    /// Attachment id of the featured image; `0` when there is none.
    pub thumbnail_id: u64,
}

impl Post {
    pub fn is_attachment(&self) -> bool {
        self.post_type == "attachment"
    }

    /// The MIME type split on `/`, empty segments removed.
    pub fn mime_segments(&self) -> impl Iterator<Item = &str> {
        self.mime_type.as_deref()
            .unwrap_or("")
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Image attachments serve as their own thumbnail.
    pub fn effective_thumbnail(&self) -> u64 {
        match self.mime_segments().next() {
            Some("image") if self.is_attachment() => self.id,
            _ => self.thumbnail_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: u64,
    pub display_name: String,
    pub nicename: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostType {
    pub name: String,
    /// The plural, human readable name, e.g. `Projects`.
    pub label: String,
    pub description: String,
    pub has_archive: bool,
}

/// Everything the host has stored that the theme layer may read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub name: String,
    pub tagline: String,
    pub posts: Vec<Post>,
    pub terms: Vec<Term>,
    pub authors: Vec<Author>,
    pub post_types: Vec<PostType>,
    pub options: Options,
}

impl Site {
    pub fn new(name: impl Into<String>, tagline: impl Into<String>) -> Self {
        Site { name: name.into(), tagline: tagline.into(), ..Site::default() }
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn term(&self, taxonomy: &str, id: u64) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id && t.taxonomy == taxonomy)
    }

    pub fn author(&self, id: u64) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }

    pub fn post_type(&self, name: &str) -> Option<&PostType> {
        self.post_types.iter().find(|t| t.name == name)
    }

    /// The static page configured to stand in for the `post_type` archive,
    /// or the posts page for `post`.
    pub fn page_for(&self, post_type: &str) -> Option<&Post> {
        self.options.page_for(post_type).and_then(|id| self.post(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(mime: &str) -> Post {
        Post {
            id: 9,
            post_type: "attachment".into(),
            mime_type: Some(mime.into()),
            thumbnail_id: 3,
            ..Post::default()
        }
    }

    #[test]
    fn mime_segments_skip_empties() {
        let post = attachment("image//jpeg ");
        assert_eq!(post.mime_segments().collect::<Vec<_>>(), ["image", "jpeg"]);
        assert_eq!(Post::default().mime_segments().count(), 0);
    }

    #[test]
    fn image_attachments_are_their_own_thumbnail() {
        assert_eq!(attachment("image/png").effective_thumbnail(), 9);
        assert_eq!(attachment("application/pdf").effective_thumbnail(), 3);
    }

    #[test]
    fn lookups_miss_quietly() {
        let mut site = Site::new("Acme", "Things and stuff");
        site.terms.push(Term { id: 4, taxonomy: "category".into(), ..Term::default() });

        assert!(site.term("category", 4).is_some());
        assert!(site.term("post_tag", 4).is_none());
        assert!(site.post(1).is_none());
        assert!(site.page_for("post").is_none());
    }
}
