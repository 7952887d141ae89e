use std::sync::Arc;

use minijinja::{context, Environment, Error, ErrorKind, State};
use minijinja::value::{Rest, Value};
use serde::Deserialize;

use crate::context::Scope;
use crate::error::Result;
use crate::hooks::{AfterPart, BeforePart};
use crate::host::Post;
use crate::template::{Probe, Resolved, ThemeTree};
use crate::theme::Theme;

/// A MiniJinja environment bound to one request's [`Theme`].
///
/// Templates are loaded by name through the theme's locator, so a child
/// theme root shadows its parents. Every template sees these globals:
///
///   * `context`: the classified context (`kind`, `tags`, `title`, ...)
///   * `site`: the site records and options
///   * `post`: the queried post, when there is one
///
/// and these functions and filters:
///
///   * `attr(element, attrs?)`: the composed attribute string of `element`;
///     `attrs` is a query string or a map of overrides
///   * `template_part(base, *qualifiers)`: renders the most specific part
///   * `entry_part(post)`: renders the `content` part for `post`
///   * `esc_attr`, `slugify`
#[derive(Debug)]
pub struct MiniJinjaEngine<P: Probe = ThemeTree> {
    theme: Arc<Theme<P>>,
    env: Environment<'static>,
}

fn part_error(what: &str, qualifiers: &[impl AsRef<str>]) -> Error {
    let qualifiers: Vec<&str> = qualifiers.iter().map(|q| q.as_ref()).collect();
    Error::new(ErrorKind::TemplateNotFound, format!("no template part for {what} {qualifiers:?}"))
}

/// Renders `part` with `post` in scope.
fn render_part<P: Probe>(
    theme: &Theme<P>,
    state: &State,
    part: Resolved,
    post: Value,
) -> Result<Value, Error> {
    let template = state.env().get_template(&part.name)?;
    theme.hooks().do_action(BeforePart, &part);
    let html = template.render(context! { post })?;
    theme.hooks().do_action(AfterPart, &part);
    Ok(Value::from_safe_string(html))
}

impl<P: Probe + 'static> MiniJinjaEngine<P> {
    pub fn new(theme: Arc<Theme<P>>) -> Self {
        let mut env = Environment::new();

        let loader = theme.clone();
        env.set_loader(move |name| {
            let Some(resolved) = loader.locator().find(name) else {
                return Ok(None);
            };

            std::fs::read_to_string(&resolved.path)
                .map(Some)
                .map_err(|e| Error::new(ErrorKind::InvalidOperation, "failed to read template")
                    .with_source(e))
        });

        env.add_global("context", Value::from_serializable(theme.context()));
        env.add_global("site", Value::from_serializable(&**theme.site()));
        let post = Scope::new(theme.site(), theme.request()).queried_post();
        env.add_global("post", Value::from_serializable(&post));

        let t = theme.clone();
        env.add_function("attr", move |element: String, attrs: Option<Value>| {
            let attrs = ext::attributes(attrs)?;
            Ok::<_, Error>(Value::from_safe_string(t.attributes(&element, attrs)))
        });

        let t = theme.clone();
        env.add_function("template_part", move |state: &State, base: String, q: Rest<String>| {
            let part = t.locate_part(&base, &q.0).ok_or_else(|| part_error(&base, &q.0))?;
            let post = state.lookup("post").unwrap_or(Value::UNDEFINED);
            render_part(&t, state, part, post)
        });

        let t = theme.clone();
        env.add_function("entry_part", move |state: &State, value: Value| {
            let post = Post::deserialize(value.clone()).map_err(|e| {
                Error::new(ErrorKind::InvalidOperation, "`entry_part` expects a post").with_source(e)
            })?;

            let part = t.entry_part(&post)
                .ok_or_else(|| part_error("content", &[&*post.post_type]))?;

            render_part(&t, state, part, value)
        });

        env.add_filter("esc_attr", ext::esc_attr);
        env.add_filter("slugify", ext::slugify);

        MiniJinjaEngine { theme, env }
    }

    pub fn theme(&self) -> &Arc<Theme<P>> {
        &self.theme
    }

    /// Renders the template named `name` (extension included).
    pub fn render(&self, name: &str) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context! {})?)
    }

    /// Renders the page template that matches the request's context.
    pub fn render_page(&self) -> Result<String> {
        let Some(page) = self.theme.page_template() else {
            let tags: Vec<&str> = self.theme.tags().collect();
            return err!("no page template matches the request", "tags" => tags.join(", "));
        };

        tracing::debug!(template = &*page.name, "rendering page");
        self.render(&page.name)
    }
}

mod ext {
    use minijinja::{Error, ErrorKind};
    use minijinja::value::{Value, ValueKind};

    use crate::attributes::Attributes;

    /// Converts the optional second argument of `attr()`: nothing, a query
    /// string, or a map whose booleans become flags.
    pub fn attributes(value: Option<Value>) -> Result<Attributes, Error> {
        let Some(value) = value.filter(|v| !v.is_undefined() && !v.is_none()) else {
            return Ok(Attributes::new());
        };

        if let Some(query) = value.as_str() {
            return Ok(Attributes::parse(query));
        }

        if value.kind() != ValueKind::Map {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("`attr` expects a string or a map, found {}", value.kind())
            ));
        }

        let mut attrs = Attributes::new();
        for key in value.try_iter()? {
            let item = value.get_item(&key)?;
            let name = key.to_string();
            match item.kind() {
                ValueKind::Bool => attrs.insert(&name, item.is_true()),
                ValueKind::Undefined | ValueKind::None => attrs.insert(&name, false),
                _ => attrs.insert(&name, item.to_string()),
            };
        }

        Ok(attrs)
    }

    pub fn esc_attr(value: &str) -> String {
        crate::util::esc_attr(value).into_owned()
    }

    pub fn slugify(value: &str) -> String {
        crate::util::slugify(value)
    }
}
