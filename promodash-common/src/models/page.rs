// File: promodash-common/src/models/page.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Pagination and search state for a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if !self.search.trim().is_empty() {
            pairs.push(("search".to_string(), self.search.trim().to_string()));
        }
        pairs
    }

    /// Encoded query string; also the cache key suffix for the list.
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.pairs())
    }

    pub fn total_pages(&self, count: u64) -> u32 {
        let size = self.page_size.max(1) as u64;
        (count.div_ceil(size)).max(1) as u32
    }
}

pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
