//! Page-number pagination for list views
//!
//! A [`ListView`] is the normalized form of a list request: which kind,
//! which page, how large, and which filter. It knows its own cache key and
//! builds the `{count, next, previous, results}` envelope.

use serde::Serialize;

use crate::cache::list_variant_key;
use crate::catalog::EntityKind;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::ListQuery;

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A normalized list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub kind: EntityKind,
    pub page: u64,
    pub page_size: usize,
    /// Exact topic-name filter, documents only
    pub topic: Option<String>,
    default_page_size: usize,
}

impl ListView {
    /// Normalizes `query` for `kind`. A page that is zero or not a number
    /// is NotFound; page sizes are clamped to `1..=max_page_size`, and an
    /// unparsable one falls back to the default; `topic` is dropped for
    /// non-documents.
    pub fn new(kind: EntityKind, query: ListQuery, config: &Config) -> Result<Self> {
        let page = match query.page.as_deref().map(str::trim) {
            None => 1,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|page| *page > 0)
                .ok_or_else(|| CatalogError::NotFound("Invalid page.".to_string()))?,
        };

        let max = config.max_page_size.max(1);
        let default_page_size = config.page_size.clamp(1, max);
        let page_size = query
            .page_size
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(max))
            .unwrap_or(default_page_size);

        let topic = match kind {
            EntityKind::Document => query.topic,
            _ => None,
        };

        Ok(Self {
            kind,
            page,
            page_size,
            topic,
            default_page_size,
        })
    }

    /// Cache key for this exact view. The default view maps to the base list key.
    pub fn cache_key(&self) -> String {
        list_variant_key(self.kind, &self.params(self.page))
    }

    /// Collection path of the kind, e.g. `/topics`.
    pub fn path(&self) -> &'static str {
        match self.kind {
            EntityKind::Topic => "/topics",
            EntityKind::Folder => "/folders",
            EntityKind::Document => "/documents",
        }
    }

    /// Slices `items` into the requested page.
    ///
    /// A page past the end is NotFound, except page 1 of an empty set.
    pub fn paginate<T>(&self, items: Vec<T>) -> Result<Page<T>> {
        let count = items.len();
        let pages = count.div_ceil(self.page_size).max(1) as u64;
        if self.page > pages {
            return Err(CatalogError::NotFound("Invalid page.".to_string()));
        }

        let start = (self.page - 1) as usize * self.page_size;
        let results = items
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        Ok(Page {
            count,
            next: (self.page < pages).then(|| self.link(self.page + 1)),
            previous: (self.page > 1).then(|| self.link(self.page - 1)),
            results,
        })
    }

    /// Non-default parameters of this view at `page`.
    fn params(&self, page: u64) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if page != 1 {
            params.push(("page", page.to_string()));
        }
        if self.page_size != self.default_page_size {
            params.push(("page_size", self.page_size.to_string()));
        }
        if let Some(topic) = &self.topic {
            params.push(("topic", topic.clone()));
        }
        params
    }

    fn link(&self, page: u64) -> String {
        let params = self.params(page);
        if params.is_empty() {
            return self.path().to_string();
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path(), query)
    }
}

/// Percent-encodes everything outside the unreserved URI set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            page_size: 2,
            max_page_size: 5,
            ..Config::default()
        }
    }

    fn view(kind: EntityKind, page: Option<u64>, size: Option<usize>, topic: Option<&str>) -> ListView {
        let query = ListQuery {
            page: page.map(|p| p.to_string()),
            page_size: size.map(|s| s.to_string()),
            topic: topic.map(str::to_string),
        };
        ListView::new(kind, query, &config()).unwrap()
    }

    #[test]
    fn test_default_view_uses_base_key() {
        let v = view(EntityKind::Topic, None, None, None);
        assert_eq!(v.cache_key(), "topic_list");

        let explicit_defaults = view(EntityKind::Topic, Some(1), Some(2), None);
        assert_eq!(explicit_defaults.cache_key(), "topic_list");
    }

    #[test]
    fn test_filter_and_page_fold_into_key() {
        let v = view(EntityKind::Document, Some(2), None, Some("T1"));
        assert_eq!(v.cache_key(), "document_list?page=2&topic=T1");
    }

    #[test]
    fn test_topic_filter_ignored_outside_documents() {
        let v = view(EntityKind::Folder, None, None, Some("T1"));
        assert_eq!(v.topic, None);
        assert_eq!(v.cache_key(), "folder_list");
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(view(EntityKind::Topic, None, Some(50), None).page_size, 5);
        assert_eq!(view(EntityKind::Topic, None, Some(0), None).page_size, 2);
    }

    #[test]
    fn test_invalid_page_is_not_found() {
        for raw in ["0", "abc", "-1", "1.5"] {
            let query = ListQuery {
                page: Some(raw.to_string()),
                ..ListQuery::default()
            };
            assert!(
                matches!(
                    ListView::new(EntityKind::Topic, query, &config()),
                    Err(CatalogError::NotFound(_))
                ),
                "page={}",
                raw
            );
        }
    }

    #[test]
    fn test_unparsable_page_size_uses_default() {
        let query = ListQuery {
            page_size: Some("lots".to_string()),
            ..ListQuery::default()
        };
        let v = ListView::new(EntityKind::Topic, query, &config()).unwrap();
        assert_eq!(v.page_size, 2);
        assert_eq!(v.cache_key(), "topic_list");
    }

    #[test]
    fn test_paginate_links() {
        let v = view(EntityKind::Document, Some(2), None, Some("My Topic"));
        let page = v.paginate(vec![1, 2, 3, 4, 5]).unwrap();

        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec![3, 4]);
        assert_eq!(page.next.as_deref(), Some("/documents?page=3&topic=My%20Topic"));
        assert_eq!(page.previous.as_deref(), Some("/documents?topic=My%20Topic"));
    }

    #[test]
    fn test_paginate_first_and_last_page() {
        let first = view(EntityKind::Topic, None, None, None)
            .paginate(vec![1, 2, 3])
            .unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.next.as_deref(), Some("/topics?page=2"));

        let last = view(EntityKind::Topic, Some(2), None, None)
            .paginate(vec![1, 2, 3])
            .unwrap();
        assert_eq!(last.results, vec![3]);
        assert_eq!(last.next, None);
        assert_eq!(last.previous.as_deref(), Some("/topics"));
    }

    #[test]
    fn test_paginate_empty_and_out_of_range() {
        let empty = view(EntityKind::Topic, None, None, None)
            .paginate(Vec::<u8>::new())
            .unwrap();
        assert_eq!(empty.count, 0);
        assert!(empty.results.is_empty());

        let past_end = view(EntityKind::Topic, Some(3), None, None).paginate(vec![1, 2, 3]);
        assert!(matches!(past_end, Err(CatalogError::NotFound(_))));
    }
}
