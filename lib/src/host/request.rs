use serde::{Deserialize, Serialize};

/// The conditional predicates the host evaluated for the current request.
///
/// Several may hold at once: a static front page is both `singular` and
/// `front_page`; a category listing is both `archive` and `category`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub singular: bool,
    pub attachment: bool,
    pub page: bool,
    pub paged: bool,
    #[serde(rename = "404", alias = "not_found")]
    pub not_found: bool,
    pub archive: bool,
    pub author: bool,
    pub category: bool,
    pub tag: bool,
    pub tax: bool,
    pub post_type_archive: bool,
    pub date: bool,
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub home: bool,
    pub search: bool,
    pub front_page: bool,
}

impl Conditions {
    /// Any term archive: category, tag or custom taxonomy.
    pub fn is_term(&self) -> bool {
        self.category || self.tag || self.tax
    }
}

/// The object the request was resolved to, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Queried {
    #[default]
    None,
    Post { id: u64 },
    Term { taxonomy: String, id: u64 },
    Author { id: u64 },
    PostType { name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateQuery {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// A read-only snapshot of the host's query state for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    #[serde(rename = "is")]
    pub conditions: Conditions,
    pub queried: Queried,
    pub date: Option<DateQuery>,
    pub search: Option<String>,
    /// The current page of a paginated listing, `0` or `1` for the first.
    pub page: u32,
    /// The post type the query asked for; used when the queried post itself
    /// is unavailable.
    pub post_type: Option<String>,
}

impl Request {
    pub fn new(conditions: Conditions, queried: Queried) -> Self {
        Request { conditions, queried, ..Request::default() }
    }

    pub fn is_paged(&self) -> bool {
        self.conditions.paged || self.page > 1
    }

    pub fn search_query(&self) -> &str {
        self.search.as_deref().map(str::trim).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reads_from_toml() {
        let request: Request = toml::from_str(r#"
            page = 2
            search = "  rust "

            [is]
            archive = true
            category = true
            404 = false

            [queried]
            type = "term"
            taxonomy = "category"
            id = 7
        "#).unwrap();

        assert!(request.conditions.archive && request.conditions.is_term());
        assert!(!request.conditions.not_found);
        assert_eq!(request.queried, Queried::Term { taxonomy: "category".into(), id: 7 });
        assert!(request.is_paged());
        assert_eq!(request.search_query(), "rust");
    }

    #[test]
    fn empty_request_queries_nothing() {
        let request: Request = toml::from_str("").unwrap();
        assert_eq!(request, Request::default());
        assert!(!request.is_paged());
        assert_eq!(request.search_query(), "");
    }
}
