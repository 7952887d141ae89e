use crate::attributes::Attributes;
use crate::context::{Context, Kind};
use crate::hooks::{ElementAttributes, ElementDefaults, Hooks};
use crate::util::sanitize_html_class;

const SCHEMA: &str = "https://schema.org/";

type Defaults = fn(&Context) -> Attributes;

/// Elements with their own defaults. Anything else gets `class="{element}"`.
static DEFAULTS: &[(&str, Defaults)] = &[
    ("body", body),
    ("site-header", |_| landmark("site-header", "masthead", "banner", "WPHeader")),
    ("site-footer", |_| landmark("site-footer", "colophon", "contentinfo", "WPFooter")),
    ("site-title", |_| Attributes::from([("class", "site-title"), ("itemprop", "headline")])),
    ("site-description", |_| Attributes::from([("class", "site-description"), ("itemprop", "description")])),
    ("content", content),
    ("entry", entry),
    ("entry-title", |_| Attributes::from([("class", "entry-title"), ("itemprop", "headline")])),
    ("sidebar", |_| landmark("sidebar widget-area", "secondary", "complementary", "WPSideBar")),
    ("menu", |_| landmark("menu", "", "navigation", "SiteNavigationElement")),
];

fn schema(kind: &str) -> String {
    format!("{SCHEMA}{kind}")
}

fn landmark(class: &str, id: &str, role: &str, item_type: &str) -> Attributes {
    Attributes::from([("class", class), ("id", id), ("role", role)])
        .with("itemscope", true)
        .with("itemtype", schema(item_type))
}

fn body(context: &Context) -> Attributes {
    let class = context.tags()
        .map(sanitize_html_class)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let item_type = match context.kind {
        Kind::Search => "SearchResultsPage",
        kind if kind.is_listing() => "Blog",
        _ => "WebPage",
    };

    Attributes::from([("class", class)])
        .with("dir", "ltr")
        .with("itemscope", true)
        .with("itemtype", schema(item_type))
}

fn content(context: &Context) -> Attributes {
    let mut attrs = Attributes::from([("class", "site-content"), ("id", "content"), ("role", "main")]);
    if context.kind.is_listing() {
        attrs.insert("itemprop", "mainContentOfPage");
    }

    attrs
}

fn entry(context: &Context) -> Attributes {
    let item_type = if context.has_tag("post") || context.kind.is_listing() {
        "BlogPosting"
    } else {
        "CreativeWork"
    };

    Attributes::from([("class", "entry")])
        .with("itemscope", true)
        .with("itemtype", schema(item_type))
}

/// Composes the attribute string of named elements for one context.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    context: &'a Context,
    hooks: &'a Hooks,
}

impl<'a> Composer<'a> {
    pub fn new(context: &'a Context, hooks: &'a Hooks) -> Self {
        Composer { context, hooks }
    }

    /// The defaults for `element` after [`ElementDefaults`] (tagged with the
    /// element name) has run.
    pub fn defaults(&self, element: &str) -> Attributes {
        let defaults = match DEFAULTS.iter().find(|(name, _)| *name == element) {
            Some((_, defaults)) => defaults(self.context),
            None => Attributes::from([("class", sanitize_html_class(element))]),
        };

        self.hooks.apply_tagged(ElementDefaults, &[element], defaults, element)
    }

    /// Renders the attributes of `element`: defaults, overridden by `attrs`,
    /// alphabetized and escaped, then passed through [`ElementAttributes`]
    /// tagged with the element name.
    pub fn compose<A: Into<Attributes>>(&self, element: &str, attrs: A) -> String {
        let mut merged = self.defaults(element);
        merged.merge(attrs.into());

        let rendered = merged.render();
        let rendered = self.hooks.apply_tagged(ElementAttributes, &[element], rendered, element);
        rendered.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::hooks::DEFAULT_PRIORITY;

    fn context(kind: Kind, tags: &[&str]) -> Context {
        Context {
            kind,
            tags: tags.iter().map(|t| Arc::from(*t)).collect(),
            title: String::new(),
            description: String::new(),
            thumbnail_id: 0,
        }
    }

    #[test]
    fn body_reflects_context() {
        let hooks = Hooks::new();
        let ctx = context(Kind::Term, &["archive", "category"]);
        assert_eq!(
            Composer::new(&ctx, &hooks).compose("body", Attributes::new()),
            r#"class="archive category" dir="ltr" itemscope="itemscope" itemtype="https://schema.org/Blog""#,
        );

        let ctx = context(Kind::Search, &["search"]);
        let body = Composer::new(&ctx, &hooks).compose("body", "dir=rtl");
        assert!(body.contains(r#"dir="rtl""#));
        assert!(body.ends_with(r#"itemtype="https://schema.org/SearchResultsPage""#));
    }

    #[test]
    fn unknown_elements_get_a_class() {
        let hooks = Hooks::new();
        let ctx = context(Kind::Site, &[]);
        let composer = Composer::new(&ctx, &hooks);

        assert_eq!(composer.compose("branding", Attributes::new()), r#"class="branding""#);
        assert_eq!(composer.compose("branding", "class="), "");
        assert_eq!(
            composer.compose("branding", Attributes::from([("id", "x"), ("hidden", "")])),
            r#"class="branding" id="x""#,
        );
    }

    #[test]
    fn caller_overrides_and_removes_defaults() {
        let hooks = Hooks::new();
        let ctx = context(Kind::Singular, &["singular", "page"]);
        let composer = Composer::new(&ctx, &hooks);

        assert_eq!(
            composer.compose("site-header", "id=top&itemtype=&itemscope="),
            r#"class="site-header" id="top" role="banner""#,
        );

        assert_eq!(
            composer.compose("entry", Attributes::new()),
            r#"class="entry" itemscope="itemscope" itemtype="https://schema.org/CreativeWork""#,
        );
    }

    #[test]
    fn defaults_and_output_are_filterable_per_element() {
        let mut hooks = Hooks::new();
        hooks.add_tagged_filter(ElementDefaults, "menu", DEFAULT_PRIORITY, |attrs, _| {
            attrs.with("aria-label", "Primary")
        });
        hooks.add_tagged_filter(ElementAttributes, "entry-title", DEFAULT_PRIORITY, |s, element: &str| {
            format!("{s} data-element=\"{element}\" ")
        });

        let ctx = context(Kind::Home, &["home"]);
        let composer = Composer::new(&ctx, &hooks);
        assert!(composer.compose("menu", Attributes::new()).starts_with(r#"aria-label="Primary" class="menu""#));
        assert_eq!(
            composer.compose("entry-title", Attributes::new()),
            r#"class="entry-title" itemprop="headline" data-element="entry-title""#,
        );

        // Filters for one element never touch another.
        assert_eq!(composer.compose("site-title", Attributes::new()), r#"class="site-title" itemprop="headline""#);
    }
}
