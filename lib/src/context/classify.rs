use std::sync::Arc;

use crate::context::{Context, Kind, Scope};
use crate::hooks::{ContextDescription, ContextTags, ContextThumbnail, ContextTitle, Hooks};
use crate::host::{Request, Site};

/// Classifies one request into a [`Context`].
///
/// The primary branch is chosen in a fixed order and the first match wins:
/// singular, 404, archive (author, term, post type, date), home, search,
/// and finally the site itself. Tags accumulate along the way, so the first
/// tag always names the primary branch. `front-page` is appended whenever the
/// request is for the front page; `paged` for later pages of a listing.
///
/// Each derived property is then folded through its tagged hook chain, once
/// per tag, in tag order.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    site: &'a Site,
    request: &'a Request,
    hooks: &'a Hooks,
}

impl<'a> Classifier<'a> {
    pub fn new(site: &'a Site, request: &'a Request, hooks: &'a Hooks) -> Self {
        Classifier { site, request, hooks }
    }

    fn scope(&self) -> Scope<'a> {
        Scope::new(self.site, self.request)
    }

    pub fn classify(&self) -> Context {
        let (kind, mut tags) = self.primary();

        let is = &self.request.conditions;
        if is.front_page {
            tags.push("front-page".into());
        }

        if kind != Kind::Singular && self.request.is_paged() {
            tags.push("paged".into());
        }

        let request = self.request;
        let tags = self.hooks.apply(ContextTags, tags, request);

        let scope = self.scope();
        let descriptor = kind.descriptor();
        let title = (descriptor.title)(&scope);
        let description = (descriptor.description)(&scope);
        let thumbnail_id = (descriptor.thumbnail)(&scope);

        let context = Context {
            title: self.hooks.apply_tagged(ContextTitle, &tags, title, request),
            description: self.hooks.apply_tagged(ContextDescription, &tags, description, request),
            thumbnail_id: self.hooks.apply_tagged(ContextThumbnail, &tags, thumbnail_id, request),
            kind,
            tags,
        };

        tracing::debug!(kind = ?context.kind, tags = ?context.tags, "classified request");
        context
    }

    /// The primary kind and the tags accumulated while finding it.
    fn primary(&self) -> (Kind, Vec<Arc<str>>) {
        let is = &self.request.conditions;
        let scope = self.scope();
        let mut tags: Vec<Arc<str>> = vec![];

        if is.singular {
            tags.push("singular".into());

            let post = scope.queried_post();
            let post_type = post.map(|p| p.post_type.as_str())
                .filter(|t| !t.is_empty())
                .or(self.request.post_type.as_deref())
                .unwrap_or(match (is.attachment, is.page) {
                    (true, _) => "attachment",
                    (_, true) => "page",
                    _ => "post",
                });

            tags.push(post_type.into());
            if is.attachment || post_type == "attachment" {
                if post_type != "attachment" {
                    tags.push("attachment".into());
                }

                if let Some(post) = post {
                    tags.extend(post.mime_segments().map(Arc::from));
                }
            }

            return (Kind::Singular, tags);
        }

        if is.not_found {
            tags.push("404".into());
            return (Kind::NotFound, tags);
        }

        if is.archive {
            tags.push("archive".into());
            let kind = self.archive(&scope, &mut tags);
            return (kind, tags);
        }

        if is.home {
            tags.push("home".into());
            return (Kind::Home, tags);
        }

        if is.search {
            tags.push("search".into());
            return (Kind::Search, tags);
        }

        (Kind::Site, tags)
    }

    fn archive(&self, scope: &Scope<'a>, tags: &mut Vec<Arc<str>>) -> Kind {
        let is = &self.request.conditions;
        if is.author {
            tags.push("author".into());
            return match scope.queried_author() {
                Some(_) => Kind::Author,
                None => Kind::Archive,
            };
        }

        if is.is_term() {
            let term = scope.queried_term();
            let taxonomy = match term {
                Some(term) => term.taxonomy.as_str(),
                None if is.category => "category",
                None if is.tag => "post_tag",
                None => "taxonomy",
            };

            tags.push(taxonomy.into());
            return match term {
                Some(_) => Kind::Term,
                None => Kind::Archive,
            };
        }

        if is.post_type_archive {
            let Some(name) = scope.queried_post_type_name() else {
                return Kind::Archive;
            };

            tags.push(name.into());
            let known = scope.queried_post_type().is_some()
                || scope.page_for_listing(Kind::PostType).is_some();

            return if known { Kind::PostType } else { Kind::Archive };
        }

        if is.date {
            tags.push("date".into());
            let granularity = match (is.year, is.month, is.day) {
                (true, _, _) => Some("year"),
                (_, true, _) => Some("month"),
                (_, _, true) => Some("day"),
                _ => None,
            };

            tags.extend(granularity.map(Arc::from));
            return match self.request.date {
                Some(_) => Kind::Date,
                None => Kind::Archive,
            };
        }

        Kind::Archive
    }
}
