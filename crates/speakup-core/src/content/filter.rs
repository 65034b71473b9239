//! Collection filters and resource paths.

use serde::{Deserialize, Serialize};

/// Category value the UI uses for "no category filter".
const ALL_CATEGORIES: &str = "all";

/// The list-bearing backend resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Scenarios,
    Stories,
    Tips,
    Scripts,
}

impl ResourceKind {
    /// Path segment under the API base URL.
    pub const fn path(&self) -> &'static str {
        match self {
            ResourceKind::Scenarios => "scenarios",
            ResourceKind::Stories => "stories",
            ResourceKind::Tips => "tips",
            ResourceKind::Scripts => "scripts",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Scope of a collection read. `Filter::default()` means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub category: Option<String>,
    pub search_term: Option<String>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Sets the category. Blank values and `"all"` clear it.
    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = normalize_category(category);
        self
    }

    /// Sets the search term. Blank values clear it.
    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search_term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    /// Query parameters for `GET /{resource}`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(term) = &self.search_term {
            pairs.push(("q", term.clone()));
        }
        pairs
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        .map(str::to_string)
}
