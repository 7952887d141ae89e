use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::host::{Author, DateFormat, Post, PostType, Queried, Request, Site, Term};

pub const NOT_FOUND_TITLE: &str = "Oops! Sorry, we can't find that page";

pub const NOT_FOUND_DESCRIPTION: &str = "<p>It looks like nothing was found at this \
    location. Maybe try one of the links below or a search?</p>";

pub const ARCHIVE_TITLE: &str = "Archives";

const DEFAULT_DAY_FORMAT: &str = "%B %-d, %Y";

/// The primary classification of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Singular,
    NotFound,
    /// Any archive whose shape isn't recognized or whose object is missing.
    Archive,
    Author,
    Term,
    PostType,
    Date,
    Home,
    Search,
    /// Nothing matched: the site's own name and tagline apply.
    Site,
}

/// What a [`Descriptor`] reads from: the stored site and the request.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub site: &'a Site,
    pub request: &'a Request,
}

/// How a [`Kind`] derives its title, description and thumbnail.
pub struct Descriptor {
    pub title: fn(&Scope<'_>) -> String,
    pub description: fn(&Scope<'_>) -> String,
    pub thumbnail: fn(&Scope<'_>) -> u64,
}

impl Kind {
    pub fn descriptor(self) -> &'static Descriptor {
        match self {
            Kind::Singular => &SINGULAR,
            Kind::NotFound => &NOT_FOUND,
            Kind::Archive => &ARCHIVE,
            Kind::Author => &AUTHOR,
            Kind::Term => &TERM,
            Kind::PostType => &POST_TYPE,
            Kind::Date => &DATE,
            Kind::Home => &HOME,
            Kind::Search => &SEARCH,
            Kind::Site => &SITE,
        }
    }

    /// Listings of many items rather than a single one.
    pub fn is_listing(self) -> bool {
        matches!(self, Kind::Archive | Kind::Author | Kind::Term
            | Kind::PostType | Kind::Date | Kind::Home | Kind::Search)
    }
}

impl<'a> Scope<'a> {
    pub fn new(site: &'a Site, request: &'a Request) -> Self {
        Scope { site, request }
    }

    pub fn queried_post(&self) -> Option<&'a Post> {
        match self.request.queried {
            Queried::Post { id } => self.site.post(id),
            _ => None,
        }
    }

    pub fn queried_term(&self) -> Option<&'a Term> {
        match &self.request.queried {
            Queried::Term { taxonomy, id } => self.site.term(taxonomy, *id),
            _ => None,
        }
    }

    pub fn queried_author(&self) -> Option<&'a Author> {
        match self.request.queried {
            Queried::Author { id } => self.site.author(id),
            _ => None,
        }
    }

    /// The post type an archive request is for.
    pub fn queried_post_type_name(&self) -> Option<&'a str> {
        match &self.request.queried {
            Queried::PostType { name } => Some(name),
            _ => self.request.post_type.as_deref(),
        }
    }

    pub fn queried_post_type(&self) -> Option<&'a PostType> {
        self.site.post_type(self.queried_post_type_name()?)
    }

    /// The static page standing in for the current listing, if configured.
    pub fn page_for_listing(&self, kind: Kind) -> Option<&'a Post> {
        match kind {
            Kind::Home => self.site.page_for("post"),
            Kind::PostType => self.site.page_for(self.queried_post_type_name()?),
            _ => None,
        }
    }
}

fn format_date(date: NaiveDate, fmt: &str) -> Option<String> {
    let mut output = String::new();
    write!(output, "{}", date.format(fmt)).ok()?;
    Some(output)
}

/// Converts a host-style date format (`F j, Y`) into a chrono one. Formats
/// that already contain a `%` are taken to be chrono formats and returned
/// as is. A backslash escapes the next character.
pub fn to_strftime(fmt: &str) -> String {
    if fmt.contains('%') {
        return fmt.to_string();
    }

    let mut output = String::with_capacity(fmt.len() * 2);
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        let spec = match c {
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'z' => "%-j",
            'F' => "%B",
            'M' => "%b",
            'm' => "%m",
            'n' => "%-m",
            'Y' => "%Y",
            'y' => "%y",
            '\\' => {
                output.extend(chars.next());
                continue;
            }
            c => {
                output.push(c);
                continue;
            }
        };

        output.push_str(spec);
    }

    output
}

fn date_title(scope: &Scope<'_>) -> String {
    let Some(date) = scope.request.date else {
        return ARCHIVE_TITLE.into();
    };

    let is = &scope.request.conditions;
    let (month, day) = match (date.month, date.day) {
        (Some(m), Some(d)) if !is.year && !is.month => (m, Some(d)),
        (Some(m), _) if !is.year => (m, None),
        _ => return date.year.to_string(),
    };

    let Some(day) = day else {
        return NaiveDate::from_ymd_opt(date.year, month, 1)
            .and_then(|d| format_date(d, "%B %Y"))
            .unwrap_or_else(|| format!("{}-{month:02}", date.year));
    };

    let Some(naive) = NaiveDate::from_ymd_opt(date.year, month, day) else {
        return format!("{}-{month:02}-{day:02}", date.year);
    };

    scope.site.options.get(DateFormat)
        .map(|fmt| to_strftime(&fmt))
        .and_then(|fmt| format_date(naive, &fmt))
        .or_else(|| format_date(naive, DEFAULT_DAY_FORMAT))
        .unwrap_or_default()
}

fn nothing(_: &Scope<'_>) -> String {
    String::new()
}

fn no_thumbnail(_: &Scope<'_>) -> u64 {
    0
}

static SINGULAR: Descriptor = Descriptor {
    title: |s| s.queried_post().map(|p| p.title.clone()).unwrap_or_default(),
    description: |s| s.queried_post().map(|p| p.excerpt.clone()).unwrap_or_default(),
    thumbnail: |s| s.queried_post().map_or(0, Post::effective_thumbnail),
};

static NOT_FOUND: Descriptor = Descriptor {
    title: |_| NOT_FOUND_TITLE.into(),
    description: |_| NOT_FOUND_DESCRIPTION.into(),
    thumbnail: no_thumbnail,
};

static ARCHIVE: Descriptor = Descriptor {
    title: |_| ARCHIVE_TITLE.into(),
    description: nothing,
    thumbnail: no_thumbnail,
};

static AUTHOR: Descriptor = Descriptor {
    title: |s| s.queried_author().map(|a| a.display_name.clone()).unwrap_or_default(),
    description: |s| s.queried_author().map(|a| a.description.clone()).unwrap_or_default(),
    thumbnail: no_thumbnail,
};

static TERM: Descriptor = Descriptor {
    title: |s| s.queried_term().map(|t| t.name.clone()).unwrap_or_default(),
    description: |s| s.queried_term().map(|t| t.description.clone()).unwrap_or_default(),
    thumbnail: no_thumbnail,
};

static POST_TYPE: Descriptor = Descriptor {
    title: |s| match s.page_for_listing(Kind::PostType) {
        Some(page) => page.title.clone(),
        None => s.queried_post_type().map(|t| t.label.clone()).unwrap_or_default(),
    },
    description: |s| match s.page_for_listing(Kind::PostType) {
        Some(page) => page.excerpt.clone(),
        None => s.queried_post_type().map(|t| t.description.clone()).unwrap_or_default(),
    },
    thumbnail: |s| s.page_for_listing(Kind::PostType).map_or(0, |p| p.thumbnail_id),
};

static DATE: Descriptor = Descriptor {
    title: date_title,
    description: nothing,
    thumbnail: no_thumbnail,
};

static HOME: Descriptor = Descriptor {
    title: |s| match s.page_for_listing(Kind::Home) {
        Some(page) => page.title.clone(),
        None => s.site.name.clone(),
    },
    description: |s| match s.page_for_listing(Kind::Home) {
        Some(page) => page.excerpt.clone(),
        None => s.site.tagline.clone(),
    },
    thumbnail: |s| s.page_for_listing(Kind::Home).map_or(0, |p| p.thumbnail_id),
};

static SEARCH: Descriptor = Descriptor {
    title: |s| format!("Search results for \"{}\"", s.request.search_query()),
    description: nothing,
    thumbnail: no_thumbnail,
};

static SITE: Descriptor = Descriptor {
    title: |s| s.site.name.clone(),
    description: |s| s.site.tagline.clone(),
    thumbnail: no_thumbnail,
};
