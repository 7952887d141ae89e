use std::path::Path;
use std::sync::Arc;

use derive_more::Debug;
use once_cell::sync::OnceCell;

use crate::attributes::{Attributes, Composer};
use crate::context::{Classifier, Context, Kind};
use crate::error::{Chainable, Result};
use crate::hooks::{DocumentTitle, Hooks};
use crate::host::{Post, Request, Site};
use crate::settings::ThemeSettings;
use crate::template::{Locator, Probe, Resolved, ThemeTree};

/// Everything the templates of one request need, constructed once per
/// request and handed to the rendering pipeline.
///
/// The [`Context`] is classified lazily on first use and reused thereafter;
/// template lookups are memoized by the [`Locator`].
#[derive(Debug)]
pub struct Theme<P: Probe = ThemeTree> {
    #[debug(ignore)]
    site: Arc<Site>,
    request: Request,
    hooks: Arc<Hooks>,
    #[debug(ignore)]
    locator: Locator<P>,
    settings: ThemeSettings,
    context: OnceCell<Context>,
}

impl Theme<ThemeTree> {
    /// Indexes each of `roots`, child first, and reads the settings of the
    /// first one.
    pub fn open<R: AsRef<Path>>(
        site: Arc<Site>,
        request: Request,
        hooks: Arc<Hooks>,
        roots: &[R],
    ) -> Result<Self> {
        let Some(first) = roots.first() else {
            return err!("a theme needs at least one root directory");
        };

        let settings = ThemeSettings::discover(first)?;
        let trees = roots.iter()
            .map(|root| ThemeTree::build(root).chain_with(|| error! {
                "failed to index theme root",
                "root" => root.as_ref().display(),
            }))
            .collect::<Result<Vec<_>>>()?;

        let locator = Locator::new(trees, &settings.extension);
        Ok(Theme::new(site, request, hooks, locator, settings))
    }
}

impl<P: Probe> Theme<P> {
    pub fn new(
        site: Arc<Site>,
        request: Request,
        hooks: Arc<Hooks>,
        locator: Locator<P>,
        settings: ThemeSettings,
    ) -> Self {
        Theme { site, request, hooks, locator, settings, context: OnceCell::new() }
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn locator(&self) -> &Locator<P> {
        &self.locator
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn context(&self) -> &Context {
        self.context.get_or_init(|| {
            Classifier::new(&self.site, &self.request, &self.hooks).classify()
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.context().tags()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.context().has_tag(tag)
    }

    pub fn title(&self) -> &str {
        &self.context().title
    }

    pub fn description(&self) -> &str {
        &self.context().description
    }

    pub fn thumbnail_id(&self) -> u64 {
        self.context().thumbnail_id
    }

    /// The attribute string for `element`, ready to be placed in its opening
    /// tag.
    pub fn attributes<A: Into<Attributes>>(&self, element: &str, attrs: A) -> String {
        Composer::new(self.context(), &self.hooks).compose(element, attrs)
    }

    /// Resolves the template part `base` inside the parts directory.
    pub fn locate_part<S: AsRef<str>>(&self, base: &str, qualifiers: &[S]) -> Option<Resolved> {
        self.locator.locate_in(&self.settings.parts_dir, base, qualifiers, &self.hooks)
    }

    /// The `content` part for `post`, qualified by the stage (`single` or
    /// `archive`), the post type and the post format.
    pub fn entry_part(&self, post: &Post) -> Option<Resolved> {
        let stage = match self.context().kind {
            Kind::Singular => "single",
            _ => "archive",
        };

        let format = post.format.as_deref().unwrap_or("");
        self.locate_part("content", &[stage, &post.post_type, format])
    }

    /// The top-level template for the request: `index` qualified by the
    /// context tags, e.g. `index-archive-category`, `index-archive`, `index`.
    pub fn page_template(&self) -> Option<Resolved> {
        let tags: Vec<&str> = self.tags().collect();
        self.locator.locate("index", &tags, &self.hooks)
    }

    /// The text of the document `<title>`: the context title and the site
    /// name, or just one of them when the other is empty or they coincide.
    /// The posts home page uses the site name alone.
    pub fn document_title(&self) -> String {
        let context = self.context();
        let (title, name) = (context.title.trim(), self.site.name.trim());
        let text = match (title, name) {
            ("", name) => name.to_string(),
            (_, name) if context.kind == Kind::Home && !name.is_empty() => name.to_string(),
            (title, "") => title.to_string(),
            (title, name) if title == name => name.to_string(),
            (title, name) => format!("{title}{}{name}", self.settings.title_separator),
        };

        self.hooks.apply(DocumentTitle, text, context)
    }
}
